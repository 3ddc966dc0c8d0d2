// ==========================================
// 地震情景后果模拟 - 后果计算引擎
// ==========================================
// 职责: 资产强度 → 最近 IM 等级 → 后果分布 → 按资产置换重排
// 红线: 种子只由遍历位置决定 (seed = position + 1), 不使用隐藏计数器
// 红线: 同一资产同一事件的所有构件/字段共用同一置换
// ==========================================

use crate::domain::consequence::{ConsequenceModel, TaxonomyConsequence};
use crate::domain::exposure::{Asset, AssetGroup};
use crate::domain::hazard::HazardCatalog;
use crate::domain::result::AssetEventOutcome;
use crate::domain::types::{im_type_matches, EventId};
use crate::engine::consequence_core::ConsequenceCore;
use crate::engine::permutation::{seed_for_position, seeded_permutation};
use crate::error::{ImpactError, ImpactResult};
use std::sync::Arc;
use tracing::{debug, info, instrument};

// ==========================================
// ConsequenceEngine - 后果计算引擎
// ==========================================
pub struct ConsequenceEngine {
    catalog: Arc<HazardCatalog>,
    model: Arc<ConsequenceModel>,
}

impl ConsequenceEngine {
    pub fn new(catalog: Arc<HazardCatalog>, model: Arc<ConsequenceModel>) -> Self {
        Self { catalog, model }
    }

    /// 校验分类的 IM 类型与目录一致 (不区分大小写)
    pub fn check_im_type(&self, taxonomy: &TaxonomyConsequence) -> ImpactResult<()> {
        if im_type_matches(&taxonomy.im_type, self.catalog.im_type()) {
            Ok(())
        } else {
            Err(ImpactError::ImTypeMismatch {
                taxonomy: taxonomy.taxonomy.clone(),
                declared: taxonomy.im_type.clone(),
                catalog: self.catalog.im_type().to_string(),
            })
        }
    }

    /// 计算单个资产在若干事件下的后果
    ///
    /// # 参数
    /// - event_ids: 目标事件
    /// - asset: 已解析危险性站点的资产
    /// - position: 资产在全局遍历顺序中的位置 (从 0 开始)
    ///
    /// # 规则
    /// - 置换只生成一次, 该资产的所有目标事件共用
    ///
    /// # 错误
    /// - UnknownTaxonomy / ImTypeMismatch / UnresolvedAsset
    /// - MissingGroundMotion: 资产站点在目标事件下无地震动记录
    pub fn compute_asset(
        &self,
        event_ids: &[EventId],
        asset: &Asset,
        position: usize,
    ) -> ImpactResult<Vec<AssetEventOutcome>> {
        let taxonomy =
            self.model
                .taxonomy(&asset.taxonomy)
                .ok_or_else(|| ImpactError::UnknownTaxonomy {
                    asset: asset.name.clone(),
                    taxonomy: asset.taxonomy.clone(),
                })?;
        self.check_im_type(taxonomy)?;

        let site_id = asset
            .hazard_site_id
            .ok_or_else(|| ImpactError::UnresolvedAsset(asset.name.clone()))?;

        let seed = seed_for_position(position);
        let perm = seeded_permutation(self.model.n_realizations(), seed);
        let levels = taxonomy.im_levels();

        let mut outcomes = Vec::with_capacity(event_ids.len());
        for &event_id in event_ids {
            let intensity = self.catalog.intensity(site_id, event_id).ok_or_else(|| {
                ImpactError::MissingGroundMotion {
                    asset: asset.name.clone(),
                    site_id,
                    event_id,
                }
            })?;

            let level_idx = ConsequenceCore::nearest_level_index(&levels, intensity)
                .ok_or_else(|| ImpactError::EmptyImLevels(taxonomy.taxonomy.clone()))?;
            let level = &taxonomy.levels[level_idx];

            debug!(
                asset = %asset.name,
                event_id,
                site_id,
                seed,
                intensity,
                im_level = level.im_level,
                tier_one = level.distribution.is_tier_one(),
                "资产后果计算"
            );

            outcomes.push(AssetEventOutcome {
                event_id,
                asset_name: asset.name.clone(),
                taxonomy: taxonomy.taxonomy.clone(),
                consequence: ConsequenceCore::reindex_distribution(&level.distribution, &perm),
            });
        }

        Ok(outcomes)
    }

    /// 按全局遍历顺序计算所有资产在若干事件下的后果
    ///
    /// # 规则
    /// - 遍历顺序: 分组顺序 → 组内资产顺序; 位置连续编号
    /// - 输出顺序: 资产优先, 同一资产内按 event_ids 顺序
    #[instrument(skip_all, fields(events = event_ids.len(), groups = groups.len()))]
    pub fn compute(
        &self,
        event_ids: &[EventId],
        groups: &[AssetGroup],
    ) -> ImpactResult<Vec<AssetEventOutcome>> {
        let mut outcomes = Vec::new();
        let mut position = 0;

        for group in groups {
            for asset in &group.assets {
                outcomes.extend(self.compute_asset(event_ids, asset, position)?);
                position += 1;
            }
        }

        info!(
            assets = position,
            outcomes = outcomes.len(),
            "后果计算完成"
        );
        Ok(outcomes)
    }

    /// 计算单个事件
    pub fn compute_event(
        &self,
        event_id: EventId,
        groups: &[AssetGroup],
    ) -> ImpactResult<Vec<AssetEventOutcome>> {
        self.compute(&[event_id], groups)
    }
}
