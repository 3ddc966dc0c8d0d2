// ==========================================
// 地震情景后果模拟 - 后果结果
// ==========================================
// 结构: event_id → asset_name → component → field → 重排后的数组
// 红线: 每次运行新建, 只由 ConsequenceAggregator 组装
// ==========================================

use crate::domain::consequence::{ComponentRealizations, RecoveryRealization, GLOBAL_COMPONENT};
use crate::domain::types::EventId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单资产单事件的后果 (component → 字段数组)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetConsequence {
    pub components: BTreeMap<String, ComponentRealizations>,
}

impl AssetConsequence {
    pub fn component(&self, name: &str) -> Option<&ComponentRealizations> {
        self.components.get(name)
    }

    pub fn global(&self) -> Option<&ComponentRealizations> {
        self.components.get(GLOBAL_COMPONENT)
    }
}

/// 单资产单事件的计算输出 (引擎 → 汇总器)
#[derive(Debug, Clone, PartialEq)]
pub struct AssetEventOutcome {
    pub event_id: EventId,
    pub asset_name: String,
    pub taxonomy: String,
    pub consequence: AssetConsequence,
}

/// 后果结果 (按事件)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsequenceResult {
    pub events: BTreeMap<EventId, BTreeMap<String, AssetConsequence>>,
}

impl ConsequenceResult {
    pub fn event(&self, event_id: EventId) -> Option<&BTreeMap<String, AssetConsequence>> {
        self.events.get(&event_id)
    }

    pub fn asset(&self, event_id: EventId, asset_name: &str) -> Option<&AssetConsequence> {
        self.events.get(&event_id)?.get(asset_name)
    }

    /// 第 rlz_id 个恢复实现 (从 1 开始编号)
    pub fn recovery_realization(
        &self,
        event_id: EventId,
        asset_name: &str,
        rlz_id: usize,
    ) -> Option<&RecoveryRealization> {
        let index = rlz_id.checked_sub(1)?;
        self.asset(event_id, asset_name)?
            .global()?
            .recovery
            .as_ref()?
            .get(index)
    }

    pub fn event_ids(&self) -> impl Iterator<Item = EventId> + '_ {
        self.events.keys().copied()
    }
}

/// 最频繁损伤状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageStateSummary {
    /// 损伤状态原值
    pub value: String,
    /// 出现次数
    pub occurrences: usize,
    /// 描述 (若后果模型提供)
    pub description: Option<String>,
}

impl DamageStateSummary {
    /// 对外标签: 优先描述, 否则原值
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.value)
    }
}
