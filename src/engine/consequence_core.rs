// ==========================================
// 地震情景后果模拟 - Consequence Core 纯函数库
// ==========================================
// 职责: 最近 IM 等级查找、后果分布按置换重排
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::consequence::{
    ComponentRealizations, ConsequenceDistribution, GLOBAL_COMPONENT,
};
use crate::domain::result::AssetConsequence;
use crate::engine::permutation::reindex;

// ==========================================
// ConsequenceCore - 纯函数工具类
// ==========================================
pub struct ConsequenceCore;

impl ConsequenceCore {
    /// 查找与强度值最接近的 IM 等级下标
    ///
    /// # 规则
    /// - argmin |level - value|, 相等时取先出现者
    /// - levels 为空 → None
    pub fn nearest_level_index(levels: &[f64], value: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, level) in levels.iter().enumerate() {
            let gap = (level - value).abs();
            let closer = match best {
                None => true,
                Some((_, best_gap)) => gap < best_gap,
            };
            if closer {
                best = Some((idx, gap));
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// 重排单个构件
    ///
    /// # 参数
    /// - include_recovery: 仅全局构件携带恢复实现
    pub fn reindex_component(
        component: &ComponentRealizations,
        perm: &[usize],
        include_recovery: bool,
    ) -> ComponentRealizations {
        ComponentRealizations {
            cost: component.cost.as_ref().map(|values| reindex(values, perm)),
            damage_state: component
                .damage_state
                .as_ref()
                .map(|values| reindex(values, perm)),
            recovery: if include_recovery {
                component.recovery.as_ref().map(|values| reindex(values, perm))
            } else {
                None
            },
        }
    }

    /// 按同一置换重排整个后果分布
    ///
    /// # 规则
    /// - Tier I: 非全局构件重排 cost/damage_state; 全局构件另重排 recovery
    /// - Tier II: 全局构件重排 cost/damage_state/recovery
    pub fn reindex_distribution(
        distribution: &ConsequenceDistribution,
        perm: &[usize],
    ) -> AssetConsequence {
        let mut consequence = AssetConsequence::default();

        match distribution {
            ConsequenceDistribution::TierOne { components, global } => {
                for component in components {
                    consequence.components.insert(
                        component.name.clone(),
                        Self::reindex_component(&component.realizations, perm, false),
                    );
                }
                if let Some(global) = global {
                    consequence.components.insert(
                        GLOBAL_COMPONENT.to_string(),
                        Self::reindex_component(global, perm, true),
                    );
                }
            }
            ConsequenceDistribution::TierTwo { global } => {
                consequence.components.insert(
                    GLOBAL_COMPONENT.to_string(),
                    Self::reindex_component(global, perm, true),
                );
            }
        }

        consequence
    }
}
