// ==========================================
// 地震情景后果模拟 - 核心库
// ==========================================
// 范围: 资产站点解析、事件筛选、后果计算与汇总
// 系统定位: 纯计算引擎 (数据加载与可视化由外部负责)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 筛选与计算
pub mod engine;

// 导入层 - 后果定义
pub mod importer;

// 配置层 - 情景配置
pub mod config;

// 统一错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AssetType, Coordinates, EventId, RuptureId, SiteId};

// 领域实体
pub use domain::{
    Asset, AssetConsequence, AssetGroup, AssetLocation, ConsequenceDistribution,
    ConsequenceModel, ConsequenceResult, DamageStateSummary, Event, ExposureSite,
    GroundMotionSample, HazardCatalog, HazardSite, Hypocenter, Rupture, TaxonomyConsequence,
};

// 引擎
pub use engine::{
    ConsequenceAggregator, ConsequenceEngine, EventFilter, ExposureIndex, FilterReport,
    ScenarioOrchestrator, ScenarioOutcome,
};

// 配置
pub use config::{FilterConfig, ScenarioConfig, SiteMatching};

// 错误
pub use error::{ErrorKind, ImpactError, ImpactResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "地震情景后果模拟";
