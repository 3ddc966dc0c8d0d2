// ==========================================
// 地震情景后果模拟 - 后果定义原始结构
// ==========================================
// 职责: 后果定义 JSON 的 serde 映射 (未校验)
// 红线: 只描述文件形状, Tier 判别与校验在 ConsequenceLoader 中完成
// ==========================================

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// 后果定义文件
#[derive(Debug, Clone, Deserialize)]
pub struct RawConsequenceFile {
    pub mtdata: RawMetadata,
    pub consequences_by_taxonomy: Vec<RawTaxonomyRecord>,
}

/// 文件元数据
#[derive(Debug, Clone, Deserialize)]
pub struct RawMetadata {
    #[serde(rename = "Nrealizations")]
    pub n_realizations: usize,
}

/// 单个 (灾种, 资产分类) 记录
#[derive(Debug, Clone, Deserialize)]
pub struct RawTaxonomyRecord {
    pub asset_taxonomy: String,
    pub hazard_type: String,
    pub im_type: String,
    #[serde(default)]
    pub component_damage_state_description: Vec<RawComponentDescription>,
    #[serde(default)]
    pub iml_consequences: Vec<RawImLevel>,
}

/// 构件的损伤状态描述
#[derive(Debug, Clone, Deserialize)]
pub struct RawComponentDescription {
    pub component: String,
    #[serde(default)]
    pub damage_states: Vec<RawDamageState>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDamageState {
    pub id: LabelValue,
    pub description: String,
}

/// 某一 IM 等级的后果记录
///
/// - Tier I: `consequences` 构件列表 (可含 component = "global")
/// - Tier II: 仅 `global`
#[derive(Debug, Clone, Deserialize)]
pub struct RawImLevel {
    pub im_level: NumberOrText,
    #[serde(default)]
    pub consequences: Option<Vec<RawComponent>>,
    #[serde(default)]
    pub global: Option<RawComponentBody>,
}

/// Tier I 构件
#[derive(Debug, Clone, Deserialize)]
pub struct RawComponent {
    pub component: String,
    #[serde(flatten)]
    pub body: RawComponentBody,
}

/// 构件字段 (未识别字段忽略)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComponentBody {
    #[serde(default)]
    pub cost: Option<Vec<f64>>,
    #[serde(default)]
    pub damage_state: Option<Vec<LabelValue>>,
    /// 列表, 或以 rlz_1..rlz_N 为键的映射
    #[serde(default)]
    pub recovery: Option<Value>,
    /// Tier I 全局构件的恢复实现 (优先于 recovery)
    #[serde(default)]
    pub recovery_realizations: Option<Value>,
}

/// 数字或字符串形式的标签 (损伤状态值 / 描述 ID)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LabelValue {
    Text(String),
    Integer(i64),
    Number(f64),
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Text(text) => write!(f, "{}", text),
            LabelValue::Integer(value) => write!(f, "{}", value),
            LabelValue::Number(value) => write!(f, "{}", value),
        }
    }
}

/// 数字或数字字符串
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(value) => Some(*value),
            NumberOrText::Text(text) => text.trim().parse().ok(),
        }
    }
}
