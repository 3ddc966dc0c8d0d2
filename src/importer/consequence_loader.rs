// ==========================================
// 地震情景后果模拟 - 后果定义加载器
// ==========================================
// 流程: 读取 JSON → 重复键检查 → 灾种过滤 → Tier 判别 → 模型校验
// 红线: Tier I / Tier II 只在此处判别一次
// ==========================================

use crate::domain::consequence::{
    ComponentRealizations, ConsequenceDistribution, ConsequenceModel, DamageStateDescription,
    ImLevelConsequence, NamedComponent, RecoveryRealization, TaxonomyConsequence,
    GLOBAL_COMPONENT,
};
use crate::error::ImpactError;
use crate::importer::consequence_schema::{
    RawComponentBody, RawConsequenceFile, RawImLevel, RawTaxonomyRecord,
};
use crate::importer::error::{ImportError, ImportResult};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// 恢复实现映射的键前缀 (rlz_1 .. rlz_N)
const RLZ_PREFIX: &str = "rlz_";

// ==========================================
// ConsequenceLoader - 后果定义加载器
// ==========================================
pub struct ConsequenceLoader;

impl ConsequenceLoader {
    /// 从文件加载指定灾种的后果模型
    ///
    /// # 参数
    /// - path: 后果定义文件路径
    /// - hazard: 灾种 (例如 "seismic")
    pub fn from_path(path: impl AsRef<Path>, hazard: &str) -> ImportResult<ConsequenceModel> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        debug!(path = %path.display(), hazard, "读取后果定义文件");
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw, hazard)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str, hazard: &str) -> ImportResult<ConsequenceModel> {
        let file: RawConsequenceFile = serde_json::from_str(raw)?;
        Self::from_raw(file, hazard)
    }

    /// 从原始结构构建后果模型
    ///
    /// # 规则
    /// 1. 所有记录 (任意灾种) 的资产分类不得重复
    /// 2. 仅保留 hazard_type == hazard 的记录, 保持文件顺序
    /// 3. 每个 IM 等级记录判别 Tier I / Tier II
    ///
    /// # 错误
    /// - Model(DuplicateTaxonomy / DuplicateComponent / RealizationLength / EmptyImLevels)
    /// - SchemaError: IM 等级或恢复实现无法识别
    pub fn from_raw(file: RawConsequenceFile, hazard: &str) -> ImportResult<ConsequenceModel> {
        let mut seen = HashSet::new();
        for record in &file.consequences_by_taxonomy {
            if !seen.insert(record.asset_taxonomy.as_str()) {
                return Err(ImpactError::DuplicateTaxonomy(record.asset_taxonomy.clone()).into());
            }
        }

        let n_realizations = file.mtdata.n_realizations;
        let total = file.consequences_by_taxonomy.len();
        let mut taxonomies = Vec::new();

        for record in file.consequences_by_taxonomy {
            if record.hazard_type != hazard {
                continue;
            }
            taxonomies.push(Self::convert_taxonomy(record, n_realizations)?);
        }

        info!(
            hazard,
            n_realizations,
            taxonomies = taxonomies.len(),
            skipped = total - taxonomies.len(),
            "后果定义加载完成"
        );
        Ok(ConsequenceModel::new(hazard, n_realizations, taxonomies)?)
    }

    fn convert_taxonomy(
        record: RawTaxonomyRecord,
        n_realizations: usize,
    ) -> ImportResult<TaxonomyConsequence> {
        let taxonomy = record.asset_taxonomy;

        let mut described = HashSet::new();
        let mut global_damage_states = Vec::new();
        for description in record.component_damage_state_description {
            if !described.insert(description.component.clone()) {
                return Err(ImpactError::DuplicateComponent {
                    taxonomy: taxonomy.clone(),
                    component: description.component,
                }
                .into());
            }
            if description.component == GLOBAL_COMPONENT {
                global_damage_states = description
                    .damage_states
                    .into_iter()
                    .map(|ds| DamageStateDescription {
                        id: ds.id.to_string(),
                        description: ds.description,
                    })
                    .collect();
            }
        }

        let mut levels = Vec::with_capacity(record.iml_consequences.len());
        for level in record.iml_consequences {
            levels.push(Self::convert_level(&taxonomy, level, n_realizations)?);
        }

        Ok(TaxonomyConsequence {
            taxonomy,
            im_type: record.im_type,
            levels,
            global_damage_states,
        })
    }

    /// 单个 IM 等级: consequences 列表 → Tier I; 仅 global → Tier II
    fn convert_level(
        taxonomy: &str,
        level: RawImLevel,
        n_realizations: usize,
    ) -> ImportResult<ImLevelConsequence> {
        let im_level = level.im_level.as_f64().ok_or_else(|| ImportError::SchemaError {
            taxonomy: taxonomy.to_string(),
            message: format!("无法解析 im_level: {:?}", level.im_level),
        })?;

        let distribution = match (level.consequences, level.global) {
            (Some(components), global) => {
                if global.is_some() {
                    warn!(taxonomy, im_level, "Tier I 记录包含顶层 global, 已忽略");
                }

                let mut names = HashSet::new();
                let mut named = Vec::new();
                let mut global = None;
                for component in components {
                    if !names.insert(component.component.clone()) {
                        return Err(ImpactError::DuplicateComponent {
                            taxonomy: taxonomy.to_string(),
                            component: component.component,
                        }
                        .into());
                    }
                    if component.component == GLOBAL_COMPONENT {
                        global = Some(Self::convert_body(
                            taxonomy,
                            component.body,
                            true,
                            n_realizations,
                        )?);
                    } else {
                        named.push(NamedComponent {
                            realizations: Self::convert_body(
                                taxonomy,
                                component.body,
                                false,
                                n_realizations,
                            )?,
                            name: component.component,
                        });
                    }
                }
                ConsequenceDistribution::TierOne {
                    components: named,
                    global,
                }
            }
            (None, Some(global)) => ConsequenceDistribution::TierTwo {
                global: Self::convert_body(taxonomy, global, true, n_realizations)?,
            },
            (None, None) => {
                return Err(ImportError::SchemaError {
                    taxonomy: taxonomy.to_string(),
                    message: format!("IM 等级 {} 既无 consequences 也无 global", im_level),
                })
            }
        };

        Ok(ImLevelConsequence {
            im_level,
            distribution,
        })
    }

    fn convert_body(
        taxonomy: &str,
        body: RawComponentBody,
        with_recovery: bool,
        n_realizations: usize,
    ) -> ImportResult<ComponentRealizations> {
        let recovery = if with_recovery {
            match body.recovery_realizations.or(body.recovery) {
                Some(value) => Some(recovery_list(taxonomy, value, n_realizations)?),
                None => None,
            }
        } else {
            None
        };

        Ok(ComponentRealizations {
            cost: body.cost,
            damage_state: body
                .damage_state
                .map(|states| states.iter().map(ToString::to_string).collect()),
            recovery,
        })
    }
}

/// 恢复实现: 列表原样保留; rlz_k 映射按 k 排序, 要求 k 连续覆盖 1..=N
fn recovery_list(
    taxonomy: &str,
    value: Value,
    n_realizations: usize,
) -> ImportResult<Vec<RecoveryRealization>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) => {
            let mut slots: Vec<Option<RecoveryRealization>> = vec![None; map.len()];
            for (key, item) in map {
                let index = key
                    .strip_prefix(RLZ_PREFIX)
                    .and_then(|k| k.parse::<usize>().ok())
                    .filter(|k| (1..=slots.len()).contains(k))
                    .ok_or_else(|| ImportError::SchemaError {
                        taxonomy: taxonomy.to_string(),
                        message: format!("无效的恢复实现键: {}", key),
                    })?;
                slots[index - 1] = Some(item);
            }
            let realizations: Vec<RecoveryRealization> = slots.into_iter().flatten().collect();
            debug!(
                taxonomy,
                realizations = realizations.len(),
                expected = n_realizations,
                "恢复实现映射已转换为列表"
            );
            Ok(realizations)
        }
        other => Err(ImportError::SchemaError {
            taxonomy: taxonomy.to_string(),
            message: format!("无法识别的恢复实现格式: {}", other),
        }),
    }
}
