// ==========================================
// 地震情景后果模拟 - 暴露模型
// ==========================================
// 职责: 资产实体、资产站点引用、暴露站点元数据
// 红线: hazard_site_id 只由 ExposureIndex 赋值, 赋值后不再修改
// ==========================================

use crate::domain::types::{AssetType, Coordinates, SiteId};
use serde::{Deserialize, Serialize};

/// 资产位置: 候选站点 + 可选的控制站点
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssetLocation {
    /// 候选站点 ID (线状资产通常为起点/终点)
    #[serde(default)]
    pub site_ids: Vec<SiteId>,

    /// 显式控制站点 (优先于任何排序/距离规则)
    #[serde(default)]
    pub control_site: Option<SiteId>,
}

/// 暴露资产
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub taxonomy: String,
    pub asset_type: AssetType,
    pub location: AssetLocation,

    /// 解析后的危险性站点 ID (初始为空)
    #[serde(default)]
    pub hazard_site_id: Option<SiteId>,
}

impl Asset {
    pub fn new(
        name: impl Into<String>,
        taxonomy: impl Into<String>,
        asset_type: AssetType,
        location: AssetLocation,
    ) -> Self {
        Self {
            name: name.into(),
            taxonomy: taxonomy.into(),
            asset_type,
            location,
            hazard_site_id: None,
        }
    }

    /// 返回带有危险性站点的副本 (不修改原对象)
    pub fn with_hazard_site(&self, site_id: SiteId) -> Self {
        let mut annotated = self.clone();
        annotated.hazard_site_id = Some(site_id);
        annotated
    }
}

/// 暴露站点元数据 (暴露模型站点 ID → 坐标)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureSite {
    pub site_id: SiteId,
    pub lon: f64,
    pub lat: f64,
}

impl ExposureSite {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lon, self.lat)
    }
}

/// 同一分类下已解析的资产 (遍历顺序: 分类顺序 → 分类内资产顺序)
#[derive(Debug, Clone, PartialEq)]
pub struct AssetGroup {
    pub taxonomy: String,
    pub assets: Vec<Asset>,
}
