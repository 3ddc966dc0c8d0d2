// ==========================================
// 地震情景后果模拟 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::error::{ErrorKind, ImpactError};
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("JSON 解析失败: {0}")]
    JsonParseError(String),

    // ===== 结构错误 =====
    #[error("后果定义结构错误 (taxonomy={taxonomy}): {message}")]
    SchemaError { taxonomy: String, message: String },

    // ===== 模型校验错误 =====
    #[error(transparent)]
    Model(#[from] ImpactError),
}

impl ImportError {
    /// 模型校验错误的分类 (其余导入错误无分类)
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ImportError::Model(err) => Some(err.kind()),
            _ => None,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
