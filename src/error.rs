// ==========================================
// 地震情景后果模拟 - 统一错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 四类错误均终止整次运行, 不返回部分结果
// ==========================================

use crate::domain::types::{EventId, RuptureId, SiteId};
use thiserror::Error;

// ==========================================
// 错误分类 (Error Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration, // 配置错误: IM 类型不一致、缺少参考坐标、重复键
    Match,         // 匹配错误: 资产无法匹配到危险性站点
    EmptyResult,   // 空结果: 事件筛选后无剩余事件
    Integrity,     // 完整性错误: 暴露与危险性数据不一致
}

/// 引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImpactError {
    // ===== 配置错误 =====
    #[error("IM 类型不一致 (taxonomy={taxonomy}): 后果模型={declared}, 地震动目录={catalog}")]
    ImTypeMismatch {
        taxonomy: String,
        declared: String,
        catalog: String,
    },

    #[error("地震动样本 IM 类型不一致 (site={site_id}, event={event_id}): 样本={sample}, 目录={catalog}")]
    SampleImTypeMismatch {
        site_id: SiteId,
        event_id: EventId,
        sample: String,
        catalog: String,
    },

    #[error("按距离筛选事件需要参考坐标 (ref_coords)")]
    MissingReferenceCoordinates,

    #[error("后果模型中存在重复的资产分类: {0}")]
    DuplicateTaxonomy(String),

    #[error("重复的构件 (taxonomy={taxonomy}): {component}")]
    DuplicateComponent { taxonomy: String, component: String },

    #[error("实现数组长度错误 (taxonomy={taxonomy}, component={component}, field={field}): 期望 {expected}, 实际 {actual}")]
    RealizationLength {
        taxonomy: String,
        component: String,
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("资产分类 {0} 未定义任何 IM 等级")]
    EmptyImLevels(String),

    #[error("配置值无效: {0}")]
    InvalidConfiguration(String),

    // ===== 匹配错误 =====
    #[error("资产 {asset} 未指定任何站点")]
    NoSiteReference { asset: String },

    #[error("资产 {asset} 的站点 {site_id} 不在暴露站点元数据中")]
    UnknownExposureSite { asset: String, site_id: SiteId },

    #[error("资产 {asset} 最近的危险性站点距离 {nearest_km:.3} km, 超过允许值 {max_km} km")]
    NoHazardSiteWithinDistance {
        asset: String,
        nearest_km: f64,
        max_km: f64,
    },

    #[error("危险性站点集合为空, 无法匹配资产 {asset}")]
    NoHazardSites { asset: String },

    // ===== 空结果 =====
    #[error("事件筛选后无剩余事件 (阶段: {stage})")]
    NoSurvivingEvents { stage: &'static str },

    // ===== 完整性错误 =====
    #[error("资产 {asset} 的站点 {site_id} 在事件 {event_id} 下无地震动记录")]
    MissingGroundMotion {
        asset: String,
        site_id: SiteId,
        event_id: EventId,
    },

    #[error("事件 {event_id} 引用的破裂 {rupture_id} 不存在")]
    UnknownRupture {
        event_id: EventId,
        rupture_id: RuptureId,
    },

    #[error("事件 {0} 不在地震动目录中")]
    UnknownEvent(EventId),

    #[error("资产 {0} 尚未解析危险性站点")]
    UnresolvedAsset(String),

    #[error("资产 {asset} 的分类 {taxonomy} 不在后果模型中")]
    UnknownTaxonomy { asset: String, taxonomy: String },
}

impl ImpactError {
    /// 错误所属分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImpactError::ImTypeMismatch { .. }
            | ImpactError::SampleImTypeMismatch { .. }
            | ImpactError::MissingReferenceCoordinates
            | ImpactError::DuplicateTaxonomy(_)
            | ImpactError::DuplicateComponent { .. }
            | ImpactError::RealizationLength { .. }
            | ImpactError::EmptyImLevels(_)
            | ImpactError::InvalidConfiguration(_) => ErrorKind::Configuration,

            ImpactError::NoSiteReference { .. }
            | ImpactError::UnknownExposureSite { .. }
            | ImpactError::NoHazardSiteWithinDistance { .. }
            | ImpactError::NoHazardSites { .. } => ErrorKind::Match,

            ImpactError::NoSurvivingEvents { .. } => ErrorKind::EmptyResult,

            ImpactError::MissingGroundMotion { .. }
            | ImpactError::UnknownRupture { .. }
            | ImpactError::UnknownEvent(_)
            | ImpactError::UnresolvedAsset(_)
            | ImpactError::UnknownTaxonomy { .. } => ErrorKind::Integrity,
        }
    }
}

/// Result 类型别名
pub type ImpactResult<T> = Result<T, ImpactError>;
