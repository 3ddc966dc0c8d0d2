// ==========================================
// 地震情景后果模拟 - 后果汇总器
// ==========================================
// 职责: 合并 (事件, 资产) 输出为按事件的结果; 计算最频繁损伤状态
// 红线: 只组装, 不重新计算后果
// ==========================================

use crate::domain::consequence::ConsequenceModel;
use crate::domain::result::{AssetEventOutcome, ConsequenceResult, DamageStateSummary};
use crate::domain::types::EventId;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// 资产名 → 损伤状态摘要
pub type DamageStateSummaries = BTreeMap<String, DamageStateSummary>;

// ==========================================
// ConsequenceAggregator - 后果汇总器
// ==========================================
pub struct ConsequenceAggregator {
    model: Arc<ConsequenceModel>,
}

impl ConsequenceAggregator {
    pub fn new(model: Arc<ConsequenceModel>) -> Self {
        Self { model }
    }

    /// 合并为 event_id → asset_name → 后果
    pub fn merge(&self, outcomes: &[AssetEventOutcome]) -> ConsequenceResult {
        let mut result = ConsequenceResult::default();
        for outcome in outcomes {
            let replaced = result
                .events
                .entry(outcome.event_id)
                .or_default()
                .insert(outcome.asset_name.clone(), outcome.consequence.clone());
            if replaced.is_some() {
                warn!(
                    event_id = outcome.event_id,
                    asset = %outcome.asset_name,
                    "资产名重复, 后出现的结果覆盖先前结果"
                );
            }
        }
        result
    }

    /// 每个事件下每个资产的最频繁全局损伤状态
    ///
    /// # 规则
    /// - 仅统计 "global" 构件的 damage_state
    /// - 无全局损伤状态的资产不出现在结果中
    pub fn summarize(
        &self,
        outcomes: &[AssetEventOutcome],
    ) -> BTreeMap<EventId, DamageStateSummaries> {
        let mut summaries: BTreeMap<EventId, DamageStateSummaries> = BTreeMap::new();

        for outcome in outcomes {
            let states = outcome
                .consequence
                .global()
                .and_then(|global| global.damage_state.as_deref());
            let Some((value, occurrences)) = states.and_then(most_frequent) else {
                warn!(
                    event_id = outcome.event_id,
                    asset = %outcome.asset_name,
                    "资产无全局损伤状态, 跳过标签"
                );
                continue;
            };

            let description = self
                .model
                .taxonomy(&outcome.taxonomy)
                .and_then(|taxonomy| taxonomy.damage_state_description(value))
                .map(str::to_string);

            summaries.entry(outcome.event_id).or_default().insert(
                outcome.asset_name.clone(),
                DamageStateSummary {
                    value: value.to_string(),
                    occurrences,
                    description,
                },
            );
        }

        debug!(events = summaries.len(), "损伤状态汇总完成");
        summaries
    }

    /// 资产名 → 标签 (描述优先, 否则原值)
    pub fn labels(summaries: &DamageStateSummaries) -> BTreeMap<String, String> {
        summaries
            .iter()
            .map(|(asset, summary)| (asset.clone(), summary.label().to_string()))
            .collect()
    }
}

/// 众数: 相同次数时取先出现的值
pub fn most_frequent(values: &[String]) -> Option<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value.as_str()) {
            Some((_, count)) => *count += 1,
            None => counts.push((value.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best
}
