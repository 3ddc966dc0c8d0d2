// ==========================================
// 地震情景后果模拟 - 事件筛选引擎
// ==========================================
// 职责: 候选事件 → 震级区间 → 距离区间, 三阶段依次收窄
// 红线: 阶段顺序固定 (1→2→3), 后一阶段只收窄不扩大
// 红线: 任一阶段后无剩余事件 → NoSurvivingEvents, 不返回空集合
// ==========================================

use crate::config::{CandidateMode, FilterConfig};
use crate::domain::consequence::ConsequenceModel;
use crate::domain::exposure::AssetGroup;
use crate::domain::hazard::HazardCatalog;
use crate::domain::types::{im_type_matches, Coordinates, EventId};
use crate::engine::geo::great_circle_km;
use crate::error::{ImpactError, ImpactResult};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const STAGE_CANDIDATE: &str = "candidate";
pub const STAGE_MAGNITUDE: &str = "magnitude";
pub const STAGE_DISTANCE: &str = "distance";

// ==========================================
// FilterReport - 筛选报告
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct FilterReport {
    pub mode: CandidateMode,
    /// 阶段 1 后的事件数
    pub candidate_count: usize,
    /// 阶段 2 后的事件数 (阶段未启用时为 None)
    pub after_magnitude: Option<usize>,
    /// 阶段 3 后的事件数 (阶段未启用时为 None)
    pub after_distance: Option<usize>,
    pub event_ids: BTreeSet<EventId>,
}

// ==========================================
// EventFilter - 事件筛选引擎
// ==========================================
pub struct EventFilter {
    catalog: Arc<HazardCatalog>,
    model: Arc<ConsequenceModel>,
    config: FilterConfig,
    mode: CandidateMode,
}

impl EventFilter {
    /// 创建筛选引擎 (配置在此一次性校验)
    ///
    /// # 错误
    /// - MissingReferenceCoordinates / InvalidConfiguration
    pub fn new(
        catalog: Arc<HazardCatalog>,
        model: Arc<ConsequenceModel>,
        config: FilterConfig,
    ) -> ImpactResult<Self> {
        config.validate()?;
        let mode = config.candidate_mode()?;
        Ok(Self {
            catalog,
            model,
            config,
            mode,
        })
    }

    pub fn mode(&self) -> CandidateMode {
        self.mode
    }

    /// 执行三阶段筛选, 返回剩余事件
    pub fn apply(&self, groups: &[AssetGroup]) -> ImpactResult<BTreeSet<EventId>> {
        Ok(self.apply_with_report(groups)?.event_ids)
    }

    /// 执行三阶段筛选, 附带各阶段计数
    #[instrument(skip_all, fields(groups = groups.len()))]
    pub fn apply_with_report(&self, groups: &[AssetGroup]) -> ImpactResult<FilterReport> {
        self.run(groups, None)
    }

    /// 在给定事件集合内重新执行同一配置
    ///
    /// # 规则
    /// - refine(apply(groups)) == apply(groups)
    pub fn refine(
        &self,
        groups: &[AssetGroup],
        events: &BTreeSet<EventId>,
    ) -> ImpactResult<BTreeSet<EventId>> {
        Ok(self.run(groups, Some(events))?.event_ids)
    }

    fn run(
        &self,
        groups: &[AssetGroup],
        restrict: Option<&BTreeSet<EventId>>,
    ) -> ImpactResult<FilterReport> {
        // ==========================================
        // 阶段 1: 候选事件
        // ==========================================
        let mut event_ids = self.candidates(groups)?;
        if let Some(restrict) = restrict {
            event_ids.retain(|id| restrict.contains(id));
        }
        let candidate_count = event_ids.len();
        info!(mode = ?self.mode, candidates = candidate_count, "阶段1: 候选事件");
        if event_ids.is_empty() {
            return Err(ImpactError::NoSurvivingEvents {
                stage: STAGE_CANDIDATE,
            });
        }

        // ==========================================
        // 阶段 2: 震级区间
        // ==========================================
        let after_magnitude = if self.config.magnitude_enabled() {
            event_ids = self.within_magnitude(event_ids)?;
            info!(
                min_magnitude = ?self.config.min_magnitude,
                max_magnitude = ?self.config.max_magnitude,
                remaining = event_ids.len(),
                "阶段2: 震级筛选"
            );
            if event_ids.is_empty() {
                return Err(ImpactError::NoSurvivingEvents {
                    stage: STAGE_MAGNITUDE,
                });
            }
            Some(event_ids.len())
        } else {
            debug!("阶段2: 未设置震级区间, 跳过");
            None
        };

        // ==========================================
        // 阶段 3: 距离区间
        // ==========================================
        let after_distance = match self.config.reference_coordinates {
            Some(reference) if self.config.distance_enabled() => {
                event_ids = self.within_distance(event_ids, reference)?;
                info!(
                    min_distance = ?self.config.min_distance,
                    max_distance = ?self.config.max_distance,
                    remaining = event_ids.len(),
                    "阶段3: 距离筛选"
                );
                if event_ids.is_empty() {
                    return Err(ImpactError::NoSurvivingEvents {
                        stage: STAGE_DISTANCE,
                    });
                }
                Some(event_ids.len())
            }
            _ => {
                debug!("阶段3: 未设置距离区间, 跳过");
                None
            }
        };

        Ok(FilterReport {
            mode: self.mode,
            candidate_count,
            after_magnitude,
            after_distance,
            event_ids,
        })
    }

    /// 阶段 1: 任一分类的任一资产站点有记录 (且达到阈值) 的事件
    ///
    /// # 错误
    /// - ImTypeMismatch: 分类声明的 IM 类型与目录不一致
    /// - UnknownTaxonomy: 分组的分类不在后果模型中
    /// - UnresolvedAsset: 资产尚未解析危险性站点
    fn candidates(&self, groups: &[AssetGroup]) -> ImpactResult<BTreeSet<EventId>> {
        for taxonomy in self.model.taxonomies() {
            if !im_type_matches(&taxonomy.im_type, self.catalog.im_type()) {
                return Err(ImpactError::ImTypeMismatch {
                    taxonomy: taxonomy.taxonomy.clone(),
                    declared: taxonomy.im_type.clone(),
                    catalog: self.catalog.im_type().to_string(),
                });
            }
        }

        let mut event_ids = BTreeSet::new();
        for group in groups {
            if self.model.taxonomy(&group.taxonomy).is_none() {
                match group.assets.first() {
                    Some(asset) => {
                        return Err(ImpactError::UnknownTaxonomy {
                            asset: asset.name.clone(),
                            taxonomy: group.taxonomy.clone(),
                        })
                    }
                    None => continue,
                }
            }

            for asset in &group.assets {
                let site_id = asset
                    .hazard_site_id
                    .ok_or_else(|| ImpactError::UnresolvedAsset(asset.name.clone()))?;
                for &(event_id, value) in self.catalog.events_at_site(site_id) {
                    let qualifies = match self.mode {
                        CandidateMode::Presence => true,
                        CandidateMode::Threshold(threshold) => value >= threshold,
                    };
                    if qualifies {
                        event_ids.insert(event_id);
                    }
                }
            }
        }
        Ok(event_ids)
    }

    /// 阶段 2: 破裂震级位于 [min, max] (闭区间)
    fn within_magnitude(&self, event_ids: BTreeSet<EventId>) -> ImpactResult<BTreeSet<EventId>> {
        let mut kept = BTreeSet::new();
        for event_id in event_ids {
            let magnitude = self.catalog.rupture_of_event(event_id)?.magnitude;
            if within(magnitude, self.config.min_magnitude, self.config.max_magnitude) {
                kept.insert(event_id);
            }
        }
        Ok(kept)
    }

    /// 阶段 3: 震源到参考点的大圆距离位于 [min, max] km (闭区间)
    fn within_distance(
        &self,
        event_ids: BTreeSet<EventId>,
        reference: Coordinates,
    ) -> ImpactResult<BTreeSet<EventId>> {
        let mut kept = BTreeSet::new();
        for event_id in event_ids {
            let hypocenter = self.catalog.rupture_of_event(event_id)?.hypocenter;
            let distance =
                great_circle_km(reference, Coordinates::new(hypocenter.lon, hypocenter.lat));
            if within(distance, self.config.min_distance, self.config.max_distance) {
                kept.insert(event_id);
            }
        }
        Ok(kept)
    }
}

fn within(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}
