//! # eventreg-foundation
//!
//! Foundation layer for eventreg:
//! - Event: 이름 기반 동기 이벤트 레지스트리 (등록, 발행, 조회, 삭제)
//! - Config: 레지스트리 설정 (RegistryConfig)
//! - Error: 통합 에러 타입
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  EventRegistry                                          │
//! │  ├── on()     : 반환 형태 / 시그니처 검증 후 추가        │
//! │  ├── emit()   : 스냅샷 → 인자 바인딩 → 순차 호출         │
//! │  └── has() / names() / remove()                         │
//! │                     │                                   │
//! │                     ▼                                   │
//! │          Listener (fixed / variadic / dynamic)          │
//! │                     │                                   │
//! │                     ▼                                   │
//! │          Outcome = Result<(), ListenerError>            │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod event;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{RegistryConfig, REGISTRY_CONFIG_FILE};

// ============================================================================
// Event (이벤트 시스템)
// ============================================================================
pub use event::{
    // Listener
    dyn_outcome,
    FixedHandler,
    IntoOutcome,
    Listener,
    ListenerError,
    Outcome,
    VariadicHandler,
    // Registry
    global_registry,
    init_global_registry,
    EventRegistry,
    RegistryStats,
    // Signature & Values
    Arg,
    CallArgs,
    DynValue,
    Signature,
    TypeDesc,
};
