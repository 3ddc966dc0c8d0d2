// ==========================================
// 地震情景后果模拟 - 后果模型
// ==========================================
// 职责: 按 (灾种, 资产分类) 组织的后果分布
// 红线: Tier I / Tier II 在加载时一次性确定, 查询时不再判别
// 红线: 同一后果模型内所有实现数组长度均为 n_realizations
// ==========================================

use crate::error::{ImpactError, ImpactResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 全局构件名称
pub const GLOBAL_COMPONENT: &str = "global";

/// 恢复过程实现 (结构由外部定义, 引擎只做重排)
pub type RecoveryRealization = serde_json::Value;

// ==========================================
// ComponentRealizations - 单构件的实现数组
// ==========================================
// 仅识别 cost / damage_state / recovery 三个字段
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentRealizations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_state: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery: Option<Vec<RecoveryRealization>>,
}

impl ComponentRealizations {
    /// 校验各字段长度 = n_realizations
    fn check_lengths(&self, taxonomy: &str, component: &str, expected: usize) -> ImpactResult<()> {
        let lengths = [
            ("cost", self.cost.as_ref().map(Vec::len)),
            ("damage_state", self.damage_state.as_ref().map(Vec::len)),
            ("recovery", self.recovery.as_ref().map(Vec::len)),
        ];
        for (field, len) in lengths {
            if let Some(actual) = len {
                if actual != expected {
                    return Err(ImpactError::RealizationLength {
                        taxonomy: taxonomy.to_string(),
                        component: component.to_string(),
                        field: field.to_string(),
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }
}

/// 具名构件 (Tier I 非全局构件)
#[derive(Debug, Clone, PartialEq)]
pub struct NamedComponent {
    pub name: String,
    pub realizations: ComponentRealizations,
}

// ==========================================
// ConsequenceDistribution - 后果分布 (标签变体)
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum ConsequenceDistribution {
    /// Tier I: 多构件 + 可选全局构件(可携带恢复实现)
    TierOne {
        components: Vec<NamedComponent>,
        global: Option<ComponentRealizations>,
    },
    /// Tier II: 仅全局构件
    TierTwo { global: ComponentRealizations },
}

impl ConsequenceDistribution {
    pub fn is_tier_one(&self) -> bool {
        matches!(self, ConsequenceDistribution::TierOne { .. })
    }

    fn check(&self, taxonomy: &str, expected: usize) -> ImpactResult<()> {
        match self {
            ConsequenceDistribution::TierOne { components, global } => {
                let mut seen = HashSet::new();
                for component in components {
                    if component.name == GLOBAL_COMPONENT || !seen.insert(component.name.as_str()) {
                        return Err(ImpactError::DuplicateComponent {
                            taxonomy: taxonomy.to_string(),
                            component: component.name.clone(),
                        });
                    }
                    component
                        .realizations
                        .check_lengths(taxonomy, &component.name, expected)?;
                }
                if let Some(global) = global {
                    global.check_lengths(taxonomy, GLOBAL_COMPONENT, expected)?;
                }
                Ok(())
            }
            ConsequenceDistribution::TierTwo { global } => {
                global.check_lengths(taxonomy, GLOBAL_COMPONENT, expected)
            }
        }
    }
}

/// 某一 IM 等级下的后果分布
#[derive(Debug, Clone, PartialEq)]
pub struct ImLevelConsequence {
    pub im_level: f64,
    pub distribution: ConsequenceDistribution,
}

/// 损伤状态描述 (例如 id="DS2", description="moderate")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageStateDescription {
    pub id: String,
    pub description: String,
}

// ==========================================
// TaxonomyConsequence - 单个资产分类的后果函数
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomyConsequence {
    pub taxonomy: String,
    pub im_type: String,
    /// 按定义顺序的 IM 等级
    pub levels: Vec<ImLevelConsequence>,
    /// 全局构件的损伤状态描述
    pub global_damage_states: Vec<DamageStateDescription>,
}

impl TaxonomyConsequence {
    pub fn im_levels(&self) -> Vec<f64> {
        self.levels.iter().map(|level| level.im_level).collect()
    }

    /// 查找损伤状态描述
    ///
    /// # 规则
    /// - 先按 "DS{value}" 匹配, 再按 value 原值匹配
    pub fn damage_state_description(&self, value: &str) -> Option<&str> {
        let ds_id = format!("DS{}", value);
        self.global_damage_states
            .iter()
            .find(|ds| ds.id == ds_id)
            .or_else(|| self.global_damage_states.iter().find(|ds| ds.id == value))
            .map(|ds| ds.description.as_str())
    }
}

// ==========================================
// ConsequenceModel - 单灾种后果模型
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ConsequenceModel {
    hazard: String,
    n_realizations: usize,
    taxonomies: Vec<TaxonomyConsequence>,
}

impl ConsequenceModel {
    /// 构建后果模型并校验
    ///
    /// # 错误
    /// - DuplicateTaxonomy: 资产分类重复
    /// - DuplicateComponent: 同一 IM 等级下构件重复
    /// - EmptyImLevels: 分类未定义 IM 等级
    /// - RealizationLength: 实现数组长度 ≠ n_realizations
    pub fn new(
        hazard: impl Into<String>,
        n_realizations: usize,
        taxonomies: Vec<TaxonomyConsequence>,
    ) -> ImpactResult<Self> {
        let mut seen = HashSet::new();
        for taxonomy in &taxonomies {
            if !seen.insert(taxonomy.taxonomy.as_str()) {
                return Err(ImpactError::DuplicateTaxonomy(taxonomy.taxonomy.clone()));
            }
            if taxonomy.levels.is_empty() {
                return Err(ImpactError::EmptyImLevels(taxonomy.taxonomy.clone()));
            }
            for level in &taxonomy.levels {
                level.distribution.check(&taxonomy.taxonomy, n_realizations)?;
            }
        }

        Ok(Self {
            hazard: hazard.into(),
            n_realizations,
            taxonomies,
        })
    }

    pub fn hazard(&self) -> &str {
        &self.hazard
    }

    pub fn n_realizations(&self) -> usize {
        self.n_realizations
    }

    /// 按定义顺序的资产分类
    pub fn taxonomies(&self) -> &[TaxonomyConsequence] {
        &self.taxonomies
    }

    pub fn taxonomy(&self, name: &str) -> Option<&TaxonomyConsequence> {
        self.taxonomies.iter().find(|t| t.taxonomy == name)
    }
}
