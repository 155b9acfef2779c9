//! Event System - 이름 기반 이벤트 등록/발행 시스템
//!
//! 이벤트 이름별 리스너를 등록하고, 발행 시 인자를 시그니처에 맞춰 동기 호출합니다.
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      EventRegistry                           │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │  on(name, listener) ── 반환 형태 + 시그니처 검증      │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │  emit(name, args) ── 스냅샷 → 바인딩 → 순서대로 호출  │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! │         │                                                   │
//! │         ▼                                                   │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐      │
//! │  │  Listener 1  │  │  Listener 2  │  │  Listener N  │      │
//! │  │  (fixed)     │  │  (variadic)  │  │  (dynamic)   │      │
//! │  └──────────────┘  └──────────────┘  └──────────────┘      │
//! │         첫 실패에서 중단 (fail-fast)                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 사용법
//!
//! ```ignore
//! use eventreg_foundation::event::{global_registry, EventRegistry, Listener};
//! use eventreg_foundation::args;
//!
//! // 1. 리스너 등록
//! let registry = EventRegistry::new();
//! registry.on("user.saved", Listener::new(|id: u64| -> anyhow::Result<()> {
//!     println!("saved {}", id);
//!     Ok(())
//! }))?;
//!
//! // 2. 이벤트 발행
//! registry.emit("user.saved", &args![42u64])?;
//!
//! // 3. 전역 레지스트리 사용
//! global_registry().on("shutdown", Listener::new(|| -> anyhow::Result<()> { Ok(()) }))?;
//! ```

pub mod listener;
pub mod registry;
pub mod signature;
pub mod value;

// Re-exports
pub use listener::{
    dyn_outcome, FixedHandler, IntoOutcome, Listener, ListenerError, Outcome, VariadicHandler,
};

pub use registry::{
    // Global functions
    emit,
    global_registry,
    init_global_registry,
    on,
    // EventRegistry
    EventRegistry,
    RegistryStats,
};

pub use signature::Signature;

pub use value::{Arg, CallArgs, DynValue, TypeDesc};
