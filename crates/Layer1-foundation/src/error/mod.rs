//! Error types for eventreg
//!
//! 레지스트리의 모든 에러를 중앙에서 관리

use crate::event::ListenerError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// eventreg 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 등록 관련
    // ========================================================================
    #[error("Invalid listener: {0}")]
    InvalidListener(String),

    #[error("Invalid event name: {0}")]
    InvalidEventName(String),

    #[error("Bad return shape for '{event}': {detail}")]
    BadReturnShape { event: String, detail: String },

    #[error("Signature mismatch for '{event}': expected {expected}, found {found}")]
    SignatureMismatch {
        event: String,
        expected: String,
        found: String,
    },

    // ========================================================================
    // 디스패치 관련
    // ========================================================================
    #[error("Arity mismatch for '{event}': expected {expected} argument(s), supplied {supplied}")]
    ArityMismatch {
        event: String,
        expected: String,
        supplied: usize,
    },

    #[error("Type mismatch for '{event}' at position {position}: expected {expected}, found {found}")]
    TypeMismatch {
        event: String,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// 리스너가 반환한 실패 (원본 그대로 전달)
    #[error(transparent)]
    ListenerFailure(ListenerError),

    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// API 오용으로 인한 에러인지 확인
    ///
    /// `ListenerFailure`만 정상적인 사용 결과이고, 나머지는 모두 호출자 실수입니다.
    pub fn is_misuse(&self) -> bool {
        !matches!(self, Error::ListenerFailure(_))
    }

    /// 리스너 실패인지 확인
    pub fn is_listener_failure(&self) -> bool {
        matches!(self, Error::ListenerFailure(_))
    }

    /// 리스너가 반환한 원본 에러 참조
    pub fn listener_failure(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::ListenerFailure(source) => Some(source.as_ref()),
            _ => None,
        }
    }

    /// 리스너가 반환한 원본 에러 꺼내기
    pub fn into_listener_failure(self) -> Option<ListenerError> {
        match self {
            Error::ListenerFailure(source) => Some(source),
            _ => None,
        }
    }

    /// 시그니처 불일치 에러 생성 헬퍼
    pub fn signature_mismatch(
        event: impl Into<String>,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        Error::SignatureMismatch {
            event: event.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// 반환 형태 에러 생성 헬퍼
    pub fn bad_return_shape(event: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::BadReturnShape {
            event: event.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misuse_classification() {
        let failure = Error::ListenerFailure("disk full".into());
        assert!(!failure.is_misuse());
        assert!(failure.is_listener_failure());

        let arity = Error::ArityMismatch {
            event: "save".to_string(),
            expected: "2".to_string(),
            supplied: 1,
        };
        assert!(arity.is_misuse());
        assert!(arity.listener_failure().is_none());
    }

    #[test]
    fn test_listener_failure_is_transparent() {
        let failure = Error::ListenerFailure("disk full".into());
        assert_eq!(failure.to_string(), "disk full");

        let source = failure.into_listener_failure().unwrap();
        assert_eq!(source.to_string(), "disk full");
    }

    #[test]
    fn test_signature_mismatch_message() {
        let err = Error::signature_mismatch("tick", "fn(i32)", "fn(&str)");
        assert_eq!(
            err.to_string(),
            "Signature mismatch for 'tick': expected fn(i32), found fn(&str)"
        );
    }
}
