//! Registry Config - 이벤트 레지스트리 설정

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 설정 파일명
pub const REGISTRY_CONFIG_FILE: &str = "eventreg.json";

/// 이벤트 레지스트리 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    /// 레지스트리 이름 (로그 구분용)
    #[serde(default = "default_name")]
    pub name: String,

    /// 리스너 호출마다 trace 로그 출력
    #[serde(default)]
    pub trace_dispatch: bool,

    /// 리스너 실패 시 warn 로그 출력
    #[serde(default = "default_true")]
    pub warn_on_failure: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            trace_dispatch: false,
            warn_on_failure: true,
        }
    }
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn trace_dispatch(mut self, enabled: bool) -> Self {
        self.trace_dispatch = enabled;
        self
    }

    pub fn warn_on_failure(mut self, enabled: bool) -> Self {
        self.warn_on_failure = enabled;
        self
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// JSON 문자열에서 파싱
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// JSON 파일 로드
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// JSON 파일 로드 (Optional)
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// JSON 파일 저장
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
            }
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize: {}", e)))?;
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// 다른 설정 병합 (other 우선)
    pub fn merge(&mut self, other: RegistryConfig) {
        if other.name != default_name() {
            self.name = other.name;
        }
        self.trace_dispatch = other.trace_dispatch;
        self.warn_on_failure = other.warn_on_failure;
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn default_name() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_config_default() {
        let config = RegistryConfig::new();
        assert_eq!(config.name, "default");
        assert!(!config.trace_dispatch);
        assert!(config.warn_on_failure);
    }

    #[test]
    fn test_registry_config_builder() {
        let config = RegistryConfig::new()
            .name("plugins")
            .trace_dispatch(true)
            .warn_on_failure(false);

        assert_eq!(config.name, "plugins");
        assert!(config.trace_dispatch);
        assert!(!config.warn_on_failure);
    }

    #[test]
    fn test_from_json_defaults() {
        let config = RegistryConfig::from_json(r#"{"traceDispatch": true}"#).unwrap();
        assert_eq!(config.name, "default");
        assert!(config.trace_dispatch);
        assert!(config.warn_on_failure);

        assert!(matches!(
            RegistryConfig::from_json("not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(REGISTRY_CONFIG_FILE);

        assert!(RegistryConfig::load_optional(&path).unwrap().is_none());

        let config = RegistryConfig::new().name("ui").trace_dispatch(true);
        config.save(&path).unwrap();

        let loaded = RegistryConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_merge() {
        let mut base = RegistryConfig::new().name("core");
        base.merge(RegistryConfig::new().trace_dispatch(true));

        // 기본 이름은 덮어쓰지 않음
        assert_eq!(base.name, "core");
        assert!(base.trace_dispatch);

        base.merge(RegistryConfig::new().name("ui"));
        assert_eq!(base.name, "ui");
    }
}
