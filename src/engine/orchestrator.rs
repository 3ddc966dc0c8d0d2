// ==========================================
// 地震情景后果模拟 - 引擎编排器
// ==========================================
// 用途: 协调四个核心引擎的执行顺序
// 流程: 暴露解析 → 事件筛选 → 后果计算 → 结果汇总
// ==========================================

use crate::config::ScenarioConfig;
use crate::domain::consequence::ConsequenceModel;
use crate::domain::exposure::{Asset, ExposureSite};
use crate::domain::hazard::HazardCatalog;
use crate::domain::result::ConsequenceResult;
use crate::domain::types::EventId;
use crate::engine::aggregator::{ConsequenceAggregator, DamageStateSummaries};
use crate::engine::consequence_engine::ConsequenceEngine;
use crate::engine::event_filter::{EventFilter, FilterReport};
use crate::engine::exposure_index::ExposureIndex;
use crate::error::{ImpactError, ImpactResult};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

// ==========================================
// ScenarioOutcome - 情景结果
// ==========================================

#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    // EventFilter 输出 (单事件评估时为 None)
    pub filter_report: Option<FilterReport>,
    pub event_ids: BTreeSet<EventId>,

    // ConsequenceEngine + Aggregator 输出
    pub result: ConsequenceResult,
    pub damage_states: BTreeMap<EventId, DamageStateSummaries>,
}

impl ScenarioOutcome {
    /// 某事件下 资产名 → 最频繁损伤状态标签
    pub fn labels(&self, event_id: EventId) -> BTreeMap<String, String> {
        self.damage_states
            .get(&event_id)
            .map(ConsequenceAggregator::labels)
            .unwrap_or_default()
    }
}

// ==========================================
// ScenarioOrchestrator - 引擎编排器
// ==========================================

pub struct ScenarioOrchestrator {
    catalog: Arc<HazardCatalog>,
    model: Arc<ConsequenceModel>,
    config: ScenarioConfig,
    filter: EventFilter,
    engine: ConsequenceEngine,
    aggregator: ConsequenceAggregator,
}

impl ScenarioOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - catalog: 危险性目录 (只读共享)
    /// - model: 后果模型 (只读共享)
    /// - config: 情景配置
    ///
    /// # 错误
    /// - InvalidConfiguration: 配置灾种与后果模型灾种不一致 / 匹配距离无效
    /// - 筛选配置校验错误
    pub fn new(
        catalog: Arc<HazardCatalog>,
        model: Arc<ConsequenceModel>,
        config: ScenarioConfig,
    ) -> ImpactResult<Self> {
        if config.hazard != model.hazard() {
            return Err(ImpactError::InvalidConfiguration(format!(
                "情景灾种 {} 与后果模型灾种 {} 不一致",
                config.hazard,
                model.hazard()
            )));
        }
        // 代码中直接构造的配置同样需要校验
        config.validate()?;

        Ok(Self {
            filter: EventFilter::new(catalog.clone(), model.clone(), config.filter.clone())?,
            engine: ConsequenceEngine::new(catalog.clone(), model.clone()),
            aggregator: ConsequenceAggregator::new(model.clone()),
            catalog,
            model,
            config,
        })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    fn exposure_index(&self, exposure_sites: &[ExposureSite]) -> ImpactResult<ExposureIndex> {
        ExposureIndex::from_matching(
            self.config.site_matching,
            self.catalog.sites(),
            exposure_sites,
        )
    }

    /// 执行完整情景流程
    ///
    /// # 参数
    /// - assets: 暴露资产 (不会被修改)
    /// - exposure_sites: 暴露站点坐标 (Geodesic 匹配时使用)
    ///
    /// # 返回
    /// 剩余事件、按事件的后果结果、损伤状态摘要
    pub fn run(
        &self,
        assets: &[Asset],
        exposure_sites: &[ExposureSite],
    ) -> ImpactResult<ScenarioOutcome> {
        info!(
            assets_count = assets.len(),
            matching = ?self.config.site_matching,
            "开始执行情景模拟"
        );

        // ==========================================
        // 步骤1: ExposureIndex - 资产解析与分组
        // ==========================================
        debug!("步骤1: 解析资产危险性站点");
        let index = self.exposure_index(exposure_sites)?;
        let groups = index.group_by_taxonomy(&self.model, assets)?;

        // ==========================================
        // 步骤2: EventFilter - 事件筛选
        // ==========================================
        debug!("步骤2: 执行事件筛选");
        let report = self.filter.apply_with_report(&groups)?;
        let event_ids: Vec<EventId> = report.event_ids.iter().copied().collect();

        // ==========================================
        // 步骤3: ConsequenceEngine - 后果计算
        // ==========================================
        debug!(events = event_ids.len(), "步骤3: 执行后果计算");
        let outcomes = self.engine.compute(&event_ids, &groups)?;

        // ==========================================
        // 步骤4: ConsequenceAggregator - 结果汇总
        // ==========================================
        debug!("步骤4: 汇总后果结果");
        let result = self.aggregator.merge(&outcomes);
        let damage_states = self.aggregator.summarize(&outcomes);

        info!(
            events = event_ids.len(),
            outcomes = outcomes.len(),
            "情景模拟完成"
        );

        Ok(ScenarioOutcome {
            event_ids: report.event_ids.clone(),
            filter_report: Some(report),
            result,
            damage_states,
        })
    }

    /// 单事件影响评估 (不经过事件筛选)
    ///
    /// # 错误
    /// - UnknownEvent: 事件不在目录中
    pub fn assess_event(
        &self,
        assets: &[Asset],
        exposure_sites: &[ExposureSite],
        event_id: EventId,
    ) -> ImpactResult<ScenarioOutcome> {
        info!(event_id, assets_count = assets.len(), "开始单事件影响评估");

        if self.catalog.event(event_id).is_none() {
            return Err(ImpactError::UnknownEvent(event_id));
        }

        let index = self.exposure_index(exposure_sites)?;
        let groups = index.group_by_taxonomy(&self.model, assets)?;
        let outcomes = self.engine.compute_event(event_id, &groups)?;

        Ok(ScenarioOutcome {
            filter_report: None,
            event_ids: BTreeSet::from([event_id]),
            result: self.aggregator.merge(&outcomes),
            damage_states: self.aggregator.summarize(&outcomes),
        })
    }
}
