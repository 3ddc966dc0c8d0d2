// ==========================================
// 地震情景后果模拟 - 导入层
// ==========================================
// 职责: 外部后果定义 → 已校验的 ConsequenceModel
// 支持: JSON
// ==========================================

// 模块声明
pub mod consequence_loader;
pub mod consequence_schema;
pub mod error;

// 重导出核心类型
pub use consequence_loader::ConsequenceLoader;
pub use consequence_schema::{
    LabelValue, NumberOrText, RawComponent, RawComponentBody, RawComponentDescription,
    RawConsequenceFile, RawDamageState, RawImLevel, RawMetadata, RawTaxonomyRecord,
};
pub use error::{ImportError, ImportResult};
