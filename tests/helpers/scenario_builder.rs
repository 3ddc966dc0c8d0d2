// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use seismic_impact::domain::consequence::{
    ComponentRealizations, ConsequenceDistribution, ConsequenceModel, ImLevelConsequence,
    TaxonomyConsequence,
};
use seismic_impact::domain::exposure::{Asset, AssetGroup, AssetLocation};
use seismic_impact::domain::hazard::{
    Event, GroundMotionSample, HazardCatalog, HazardSite, Hypocenter, Rupture,
};
use seismic_impact::domain::types::{AssetType, EventId, RuptureId, SiteId};
use std::sync::Arc;

/// 后果定义夹具: BRIDGE (Tier I) + BUILDING (Tier II) + LEVEE (flood)
pub const MIXED_TIERS_JSON: &str = include_str!("../fixtures/consequences_mixed_tiers.json");

// ==========================================
// HazardCatalog 构建器
// ==========================================

pub struct CatalogBuilder {
    im_type: String,
    sites: Vec<HazardSite>,
    ruptures: Vec<Rupture>,
    events: Vec<Event>,
    samples: Vec<GroundMotionSample>,
}

impl CatalogBuilder {
    pub fn new(im_type: &str) -> Self {
        Self {
            im_type: im_type.to_string(),
            sites: Vec::new(),
            ruptures: Vec::new(),
            events: Vec::new(),
            samples: Vec::new(),
        }
    }

    pub fn site(mut self, id: SiteId, lon: f64, lat: f64) -> Self {
        self.sites.push(HazardSite { id, lon, lat });
        self
    }

    pub fn rupture(mut self, id: RuptureId, magnitude: f64, lon: f64, lat: f64) -> Self {
        self.ruptures.push(Rupture {
            id,
            magnitude,
            hypocenter: Hypocenter {
                lon,
                lat,
                depth: Some(10.0),
            },
        });
        self
    }

    pub fn event(mut self, id: EventId, rupture_id: RuptureId) -> Self {
        self.events.push(Event { id, rupture_id });
        self
    }

    pub fn sample(mut self, site_id: SiteId, event_id: EventId, value: f64) -> Self {
        self.samples.push(GroundMotionSample {
            site_id,
            event_id,
            intensity_value: value,
            im_type: self.im_type.clone(),
        });
        self
    }

    pub fn build(self) -> Arc<HazardCatalog> {
        Arc::new(
            HazardCatalog::new(
                self.im_type,
                self.sites,
                self.ruptures,
                self.events,
                self.samples,
            )
            .unwrap(),
        )
    }
}

/// 三破裂目录: 震级 [4.5, 5.5, 6.5], 事件 ID = 破裂 ID
///
/// - 破裂 1/2 震源距参考点 (22.0, 40.0) < 10 km, 破裂 3 约 255 km
/// - 站点 1: 事件 1/2/3 强度 0.05 / 0.35 / 0.50
/// - 站点 2: 事件 1/2/3 强度 0.15 / 0.22 / 0.30
/// - 站点 3: 无记录
pub fn three_rupture_catalog() -> Arc<HazardCatalog> {
    CatalogBuilder::new("PGA")
        .site(1, 22.0, 40.0)
        .site(2, 22.05, 40.0)
        .site(3, 23.0, 40.5)
        .rupture(1, 4.5, 22.0, 40.0)
        .rupture(2, 5.5, 22.1, 40.0)
        .rupture(3, 6.5, 25.0, 40.0)
        .event(1, 1)
        .event(2, 2)
        .event(3, 3)
        .sample(1, 1, 0.05)
        .sample(1, 2, 0.35)
        .sample(1, 3, 0.50)
        .sample(2, 1, 0.15)
        .sample(2, 2, 0.22)
        .sample(2, 3, 0.30)
        .build()
}

// ==========================================
// Asset 构建器
// ==========================================

pub struct AssetBuilder {
    name: String,
    taxonomy: String,
    asset_type: AssetType,
    location: AssetLocation,
}

impl AssetBuilder {
    pub fn new(name: &str, taxonomy: &str) -> Self {
        Self {
            name: name.to_string(),
            taxonomy: taxonomy.to_string(),
            asset_type: AssetType::Point,
            location: AssetLocation::default(),
        }
    }

    pub fn sites(mut self, sites: &[SiteId]) -> Self {
        self.location.site_ids = sites.to_vec();
        self
    }

    pub fn control_site(mut self, site: SiteId) -> Self {
        self.location.control_site = Some(site);
        self
    }

    pub fn asset_type(mut self, asset_type: AssetType) -> Self {
        self.asset_type = asset_type;
        self
    }

    pub fn build(self) -> Asset {
        Asset::new(self.name, self.taxonomy, self.asset_type, self.location)
    }

    /// 直接构建已解析站点的资产
    pub fn resolved(self, site: SiteId) -> Asset {
        let asset = self.sites(&[site]).build();
        asset.with_hazard_site(site)
    }
}

pub fn group(taxonomy: &str, assets: Vec<Asset>) -> AssetGroup {
    AssetGroup {
        taxonomy: taxonomy.to_string(),
        assets,
    }
}

// ==========================================
// ConsequenceModel 构建器
// ==========================================

pub fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Tier II 分布: 仅 damage_state, cost = 0..n
pub fn tier_two(damage_states: &[&str]) -> ConsequenceDistribution {
    ConsequenceDistribution::TierTwo {
        global: ComponentRealizations {
            cost: Some((0..damage_states.len()).map(|i| i as f64).collect()),
            damage_state: Some(labels(damage_states)),
            recovery: None,
        },
    }
}

pub fn taxonomy(
    name: &str,
    im_type: &str,
    levels: Vec<(f64, ConsequenceDistribution)>,
) -> TaxonomyConsequence {
    TaxonomyConsequence {
        taxonomy: name.to_string(),
        im_type: im_type.to_string(),
        levels: levels
            .into_iter()
            .map(|(im_level, distribution)| ImLevelConsequence {
                im_level,
                distribution,
            })
            .collect(),
        global_damage_states: Vec::new(),
    }
}

pub fn model(n_realizations: usize, taxonomies: Vec<TaxonomyConsequence>) -> Arc<ConsequenceModel> {
    Arc::new(ConsequenceModel::new("seismic", n_realizations, taxonomies).unwrap())
}

/// 单分类 RC (PGA), 单 IM 等级 0.1, 3 个实现
pub fn single_taxonomy_model() -> Arc<ConsequenceModel> {
    model(
        3,
        vec![taxonomy("RC", "PGA", vec![(0.1, tier_two(&["0", "1", "2"]))])],
    )
}
