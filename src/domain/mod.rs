// ==========================================
// 地震情景后果模拟 - 领域模型层
// ==========================================
// 职责: 定义危险性目录、暴露资产、后果模型、结果结构
// 红线: 不含引擎逻辑, 不含文件读写
// ==========================================

pub mod consequence;
pub mod exposure;
pub mod hazard;
pub mod result;
pub mod types;

// 重导出核心类型
pub use consequence::{
    ComponentRealizations, ConsequenceDistribution, ConsequenceModel, DamageStateDescription,
    ImLevelConsequence, NamedComponent, RecoveryRealization, TaxonomyConsequence,
    GLOBAL_COMPONENT,
};
pub use exposure::{Asset, AssetGroup, AssetLocation, ExposureSite};
pub use hazard::{Event, GroundMotionSample, HazardCatalog, HazardSite, Hypocenter, Rupture};
pub use result::{AssetConsequence, AssetEventOutcome, ConsequenceResult, DamageStateSummary};
pub use types::{AssetType, Coordinates, EventId, RuptureId, SiteId};
