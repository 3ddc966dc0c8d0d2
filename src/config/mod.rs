// ==========================================
// 地震情景后果模拟 - 配置层
// ==========================================
// 职责: 情景配置与事件筛选配置的加载、校验
// 存储: JSON 文件
// ==========================================

pub mod error;
pub mod filter_config;
pub mod scenario_config;

// 重导出核心配置
pub use error::{ConfigError, ConfigResult};
pub use filter_config::{CandidateMode, FilterConfig, FilteringMode};
pub use scenario_config::{ScenarioConfig, SiteMatching, SEISMIC_HAZARD};
