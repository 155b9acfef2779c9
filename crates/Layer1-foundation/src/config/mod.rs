//! Config - 레지스트리 설정 관리
//!
//! - `registry.rs` - RegistryConfig (로그 레이블, 디스패치 추적)

mod registry;

pub use registry::{RegistryConfig, REGISTRY_CONFIG_FILE};
