// ==========================================
// 地震情景后果模拟 - 暴露索引
// ==========================================
// 职责: 将每个资产解析到唯一的危险性站点
// 模式: Direct (站点 ID 一致) / Geodesic (最近大圆距离)
// 红线: 返回带注记的副本, 不修改调用方资产
// ==========================================

use crate::config::SiteMatching;
use crate::domain::consequence::ConsequenceModel;
use crate::domain::exposure::{Asset, AssetGroup, ExposureSite};
use crate::domain::hazard::HazardSite;
use crate::domain::types::{Coordinates, SiteId};
use crate::engine::geo::great_circle_km;
use crate::error::{ImpactError, ImpactResult};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

// ==========================================
// ExposureIndex - 暴露索引
// ==========================================
pub struct ExposureIndex {
    matching: SiteMatching,
    hazard_sites: Vec<HazardSite>,
    exposure_sites: HashMap<SiteId, Coordinates>,
}

impl ExposureIndex {
    /// 直接模式: 资产站点 ID 即危险性站点 ID
    pub fn direct() -> Self {
        Self {
            matching: SiteMatching::Direct,
            hazard_sites: Vec::new(),
            exposure_sites: HashMap::new(),
        }
    }

    /// 大圆距离模式
    ///
    /// # 参数
    /// - hazard_sites: 危险性网格站点
    /// - exposure_sites: 暴露站点元数据 (资产站点 ID → 坐标)
    /// - max_distance_km: 允许的最大匹配距离
    ///
    /// # 错误
    /// - InvalidConfiguration: max_distance_km 非有限值或为负
    pub fn geodesic(
        hazard_sites: Vec<HazardSite>,
        exposure_sites: &[ExposureSite],
        max_distance_km: f64,
    ) -> ImpactResult<Self> {
        let matching = SiteMatching::Geodesic { max_distance_km };
        matching.validate()?;
        Ok(Self {
            matching,
            hazard_sites,
            exposure_sites: exposure_sites
                .iter()
                .map(|site| (site.site_id, site.coordinates()))
                .collect(),
        })
    }

    /// 按配置构建
    pub fn from_matching(
        matching: SiteMatching,
        hazard_sites: &[HazardSite],
        exposure_sites: &[ExposureSite],
    ) -> ImpactResult<Self> {
        match matching {
            SiteMatching::Direct => Ok(Self::direct()),
            SiteMatching::Geodesic { max_distance_km } => {
                Self::geodesic(hazard_sites.to_vec(), exposure_sites, max_distance_km)
            }
        }
    }

    /// 资产的参考站点
    ///
    /// # 规则
    /// 1. 显式控制站点 → 直接使用 (忽略其他候选)
    /// 2. 唯一候选站点 → 使用该站点
    /// 3. 多个候选站点 → 取最小站点 ID
    /// 4. 无任何站点 → NoSiteReference
    pub fn reference_site(asset: &Asset) -> ImpactResult<SiteId> {
        if let Some(control) = asset.location.control_site {
            return Ok(control);
        }
        asset
            .location
            .site_ids
            .iter()
            .copied()
            .min()
            .ok_or_else(|| ImpactError::NoSiteReference {
                asset: asset.name.clone(),
            })
    }

    /// 最近危险性站点 (距离相等时取先出现者)
    pub fn nearest_hazard_site(&self, point: Coordinates) -> Option<(SiteId, f64)> {
        let mut best: Option<(SiteId, f64)> = None;
        for site in &self.hazard_sites {
            let distance = great_circle_km(point, site.coordinates());
            let closer = match best {
                None => true,
                Some((_, best_distance)) => distance < best_distance,
            };
            if closer {
                best = Some((site.id, distance));
            }
        }
        best
    }

    /// 解析资产的危险性站点
    ///
    /// # 错误
    /// - NoSiteReference: 资产未指定站点
    /// - UnknownExposureSite: 参考站点无坐标 (Geodesic)
    /// - NoHazardSites / NoHazardSiteWithinDistance: 无可匹配站点 (Geodesic)
    pub fn resolve(&self, asset: &Asset) -> ImpactResult<SiteId> {
        let reference = Self::reference_site(asset)?;

        let max_distance_km = match self.matching {
            SiteMatching::Direct => return Ok(reference),
            SiteMatching::Geodesic { max_distance_km } => max_distance_km,
        };

        let point = self.exposure_sites.get(&reference).copied().ok_or_else(|| {
            ImpactError::UnknownExposureSite {
                asset: asset.name.clone(),
                site_id: reference,
            }
        })?;

        let (site_id, distance) =
            self.nearest_hazard_site(point)
                .ok_or_else(|| ImpactError::NoHazardSites {
                    asset: asset.name.clone(),
                })?;

        if distance > max_distance_km {
            return Err(ImpactError::NoHazardSiteWithinDistance {
                asset: asset.name.clone(),
                nearest_km: distance,
                max_km: max_distance_km,
            });
        }

        debug!(
            asset = %asset.name,
            exposure_site = reference,
            hazard_site = site_id,
            distance_km = distance,
            "资产匹配到危险性站点"
        );
        Ok(site_id)
    }

    /// 解析并返回带 hazard_site_id 的资产副本
    pub fn annotate(&self, asset: &Asset) -> ImpactResult<Asset> {
        let site_id = self.resolve(asset)?;
        Ok(asset.with_hazard_site(site_id))
    }

    /// 按后果模型的资产分类分组并解析
    ///
    /// # 规则
    /// - 仅保留分类出现在后果模型中的资产
    /// - 分组顺序 = 后果模型分类顺序; 组内顺序 = 暴露模型顺序
    /// - 该顺序即全局遍历顺序 (决定置换种子)
    #[instrument(skip_all, fields(taxonomies = model.taxonomies().len(), assets = assets.len()))]
    pub fn group_by_taxonomy(
        &self,
        model: &ConsequenceModel,
        assets: &[Asset],
    ) -> ImpactResult<Vec<AssetGroup>> {
        let mut groups = Vec::with_capacity(model.taxonomies().len());
        let mut resolved_count = 0;

        for taxonomy in model.taxonomies() {
            let mut resolved = Vec::new();
            for asset in assets.iter().filter(|a| a.taxonomy == taxonomy.taxonomy) {
                resolved.push(self.annotate(asset)?);
            }
            resolved_count += resolved.len();
            groups.push(AssetGroup {
                taxonomy: taxonomy.taxonomy.clone(),
                assets: resolved,
            });
        }

        info!(
            resolved = resolved_count,
            skipped = assets.len() - resolved_count,
            "暴露资产分组完成"
        );
        Ok(groups)
    }
}
