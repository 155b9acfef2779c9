//! Event Registry - 이름 기반 동기 이벤트 레지스트리
//!
//! 이벤트 이름별로 리스너 목록을 보관하고, 등록 순서대로 동기 호출합니다.
//!
//! ## 규칙
//! - 같은 이름의 리스너는 모두 같은 파라미터 시그니처를 가집니다 (첫 등록이 기준).
//! - 디스패치는 첫 실패에서 중단하고 그 실패를 그대로 반환합니다.
//! - 디스패치는 읽기 락 안에서 리스너 목록 스냅샷만 뜨고, 락을 놓은 뒤 호출합니다.
//!   리스너 안에서 같은 레지스트리에 `on` / `emit` / `remove`를 호출해도 교착되지 않습니다.

use super::listener::Listener;
use super::signature::Signature;
use super::value::Arg;
use crate::config::RegistryConfig;
use crate::{Error, Result};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace, warn};

// ============================================================================
// RegistryStats
// ============================================================================

/// 레지스트리 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// 등록된 이벤트 이름 수
    pub events: usize,
    /// 등록된 리스너 총합
    pub listeners: usize,
    /// `emit` 호출 수
    pub dispatches: u64,
    /// 리스너 실패로 끝난 디스패치 수
    pub failures: u64,
}

// ============================================================================
// EventRegistry
// ============================================================================

/// 이벤트 레지스트리
///
/// ## 사용법
///
/// ```ignore
/// use eventreg_foundation::{args, EventRegistry, Listener};
///
/// let registry = EventRegistry::new();
///
/// registry.on("log", Listener::variadic(|level: String, codes: Vec<i32>| -> anyhow::Result<()> {
///     println!("[{}] {:?}", level, codes);
///     Ok(())
/// }))?;
///
/// registry.emit("log", &args!["INFO".to_string(), 1, 2, 3])?;
/// registry.remove(["log"]);
/// ```
pub struct EventRegistry {
    /// 설정
    config: RegistryConfig,

    /// 이벤트 이름 → 리스너 목록 (등록 순서)
    events: RwLock<HashMap<String, Vec<Arc<Listener>>>>,

    /// `emit` 호출 수
    dispatch_count: AtomicU64,

    /// 실패로 끝난 디스패치 수
    failure_count: AtomicU64,
}

impl EventRegistry {
    /// 기본 설정으로 레지스트리 생성
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// 커스텀 설정으로 레지스트리 생성
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            events: RwLock::new(HashMap::new()),
            dispatch_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ========================================================================
    // 등록 / 해제
    // ========================================================================

    /// 리스너 등록
    ///
    /// `None`은 `InvalidListener`, 반환 형태가 `Outcome` 하나가 아니면 `BadReturnShape`,
    /// 기존 리스너와 시그니처가 다르면 `SignatureMismatch`. 실패 시 레지스트리는 변경되지 않습니다.
    pub fn on(
        &self,
        name: impl Into<String>,
        listener: impl Into<Option<Listener>>,
    ) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidEventName(
                "event name must not be empty".to_string(),
            ));
        }

        let listener = listener
            .into()
            .ok_or_else(|| Error::InvalidListener(format!("listener for '{}' is null", name)))?;
        listener.validate(&name)?;

        let mut events = self.events.write();

        if let Some(first) = events.get(&name).and_then(|list| list.first()) {
            if !first.signature().same_params(listener.signature()) {
                warn!(
                    registry = %self.config.name,
                    event = %name,
                    expected = %first.signature(),
                    found = %listener.signature(),
                    "Rejected listener with mismatched signature"
                );
                return Err(Error::signature_mismatch(
                    name,
                    first.signature(),
                    listener.signature(),
                ));
            }
        }

        debug!(
            registry = %self.config.name,
            event = %name,
            listener_name = listener.name(),
            signature = %listener.signature(),
            "Registering event listener"
        );

        events.entry(name).or_default().push(Arc::new(listener));
        Ok(())
    }

    /// 이벤트 삭제
    ///
    /// 이름이 하나도 없으면 레지스트리 전체를 비웁니다. 없는 이름은 무시합니다.
    pub fn remove<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        let mut events = self.events.write();

        if names.is_empty() {
            let cleared = events.len();
            events.clear();
            debug!(registry = %self.config.name, cleared, "Cleared all events");
            return;
        }

        for name in &names {
            if let Some(list) = events.remove(name.as_ref()) {
                debug!(
                    registry = %self.config.name,
                    event = name.as_ref(),
                    listeners = list.len(),
                    "Removed event"
                );
            }
        }
    }

    /// 전체 이벤트 삭제
    pub fn clear(&self) {
        self.remove(std::iter::empty::<&str>());
    }

    // ========================================================================
    // 디스패치
    // ========================================================================

    /// 이벤트 발행
    ///
    /// 등록 순서대로 리스너를 호출하고, 첫 실패에서 중단해 `ListenerFailure`로 반환합니다.
    /// 인자 개수/타입 오류는 어떤 리스너도 호출되기 전에 보고됩니다.
    pub fn emit(&self, name: &str, args: &[Arg]) -> Result<()> {
        self.dispatch_count.fetch_add(1, Ordering::SeqCst);

        // 락은 스냅샷 동안만 유지
        let listeners = {
            let events = self.events.read();
            match events.get(name) {
                Some(list) if !list.is_empty() => list.clone(),
                _ => return Ok(()),
            }
        };

        let event: Arc<str> = Arc::from(name);
        let call_args = listeners[0].signature().bind(&event, args)?;

        for (index, listener) in listeners.iter().enumerate() {
            if self.config.trace_dispatch {
                trace!(
                    registry = %self.config.name,
                    event = name,
                    listener_name = listener.name(),
                    index,
                    "Delivering event to listener"
                );
            }

            if let Err(source) = listener.invoke(&call_args)? {
                self.failure_count.fetch_add(1, Ordering::SeqCst);
                if self.config.warn_on_failure {
                    warn!(
                        registry = %self.config.name,
                        event = name,
                        listener_name = listener.name(),
                        index,
                        error = %source,
                        "Listener failed, stopping dispatch"
                    );
                }
                return Err(Error::ListenerFailure(source));
            }
        }

        Ok(())
    }

    // ========================================================================
    // 조회
    // ========================================================================

    /// 이벤트 존재 여부
    pub fn has(&self, name: &str) -> bool {
        self.events.read().contains_key(name)
    }

    /// 등록된 이벤트 이름 (순서 없음)
    pub fn names(&self) -> Vec<String> {
        self.events.read().keys().cloned().collect()
    }

    /// 이벤트의 리스너 수
    pub fn listener_count(&self, name: &str) -> usize {
        self.events.read().get(name).map_or(0, Vec::len)
    }

    /// 이벤트에 확정된 시그니처
    pub fn signature(&self, name: &str) -> Option<Signature> {
        self.events
            .read()
            .get(name)
            .and_then(|list| list.first())
            .map(|listener| listener.signature().clone())
    }

    /// 통계 스냅샷
    pub fn stats(&self) -> RegistryStats {
        let events = self.events.read();
        RegistryStats {
            events: events.len(),
            listeners: events.values().map(Vec::len).sum(),
            dispatches: self.dispatch_count.load(Ordering::SeqCst),
            failures: self.failure_count.load(Ordering::SeqCst),
        }
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

// ============================================================================
// 전역 EventRegistry
// ============================================================================

static GLOBAL_REGISTRY: OnceLock<Arc<EventRegistry>> = OnceLock::new();

/// 전역 레지스트리 초기화
///
/// 이미 초기화된 경우 기존 레지스트리를 반환합니다 (설정은 무시됨).
pub fn init_global_registry(config: RegistryConfig) -> Arc<EventRegistry> {
    GLOBAL_REGISTRY
        .get_or_init(|| Arc::new(EventRegistry::with_config(config)))
        .clone()
}

/// 전역 레지스트리 가져오기
pub fn global_registry() -> Arc<EventRegistry> {
    GLOBAL_REGISTRY
        .get_or_init(|| Arc::new(EventRegistry::new()))
        .clone()
}

/// 전역 레지스트리에 리스너 등록 (편의 함수)
pub fn on(name: impl Into<String>, listener: impl Into<Option<Listener>>) -> Result<()> {
    global_registry().on(name, listener)
}

/// 전역 레지스트리로 이벤트 발행 (편의 함수)
pub fn emit(name: &str, args: &[Arg]) -> Result<()> {
    global_registry().emit(name, args)
}

// ============================================================================
// 테스트
// ============================================================================
