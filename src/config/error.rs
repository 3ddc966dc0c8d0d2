// ==========================================
// 地震情景后果模拟 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::error::ImpactError;
use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    FileReadError(String),

    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    #[error("不支持的灾种: {0}（仅支持 seismic）")]
    UnsupportedHazard(String),

    #[error(transparent)]
    Invalid(#[from] ImpactError),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::FileReadError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

// 引擎入口统一返回 ImpactError
impl From<ConfigError> for ImpactError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(inner) => inner,
            other => ImpactError::InvalidConfiguration(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
