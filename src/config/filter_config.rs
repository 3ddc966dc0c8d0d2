// ==========================================
// 地震情景后果模拟 - 事件筛选配置
// ==========================================
// 职责: 震级区间、距离区间、参考坐标、IM 阈值、候选模式
// 兼容: 任一可选参数取字符串 "None" 视为未设置
// ==========================================

use crate::domain::types::Coordinates;
use crate::error::{ImpactError, ImpactResult};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 候选模式 (显式指定时使用)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilteringMode {
    Presence,  // 资产站点存在地震动记录即入选
    Threshold, // 资产站点强度 ≥ 阈值才入选
}

/// 解析后的阶段 1 候选模式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateMode {
    Presence,
    Threshold(f64),
}

// ==========================================
// FilterConfig - 事件筛选配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default, deserialize_with = "legacy_optional")]
    pub min_magnitude: Option<f64>,

    #[serde(default, deserialize_with = "legacy_optional")]
    pub max_magnitude: Option<f64>,

    /// 最小震源距 (km)
    #[serde(default, deserialize_with = "legacy_optional")]
    pub min_distance: Option<f64>,

    /// 最大震源距 (km)
    #[serde(default, deserialize_with = "legacy_optional")]
    pub max_distance: Option<f64>,

    /// 距离参考点
    #[serde(default, rename = "ref_coords", deserialize_with = "legacy_optional")]
    pub reference_coordinates: Option<Coordinates>,

    #[serde(default, rename = "IM_threshold", alias = "im_threshold", deserialize_with = "legacy_optional")]
    pub im_threshold: Option<f64>,

    /// 显式候选模式 (缺省时: 有阈值 → threshold, 否则 presence)
    #[serde(default, deserialize_with = "legacy_optional")]
    pub filtering_mode: Option<FilteringMode>,
}

impl FilterConfig {
    /// 是否启用距离筛选
    pub fn distance_enabled(&self) -> bool {
        self.min_distance.is_some() || self.max_distance.is_some()
    }

    /// 是否启用震级筛选
    pub fn magnitude_enabled(&self) -> bool {
        self.min_magnitude.is_some() || self.max_magnitude.is_some()
    }

    /// 解析阶段 1 候选模式 (显式 presence 且带阈值时告警一次)
    ///
    /// # 规则
    /// 1. 显式 presence + 阈值 → 警告, 忽略阈值
    /// 2. 显式 threshold 无阈值 → 配置错误
    /// 3. 未显式指定: 有阈值 → Threshold, 否则 Presence
    pub fn candidate_mode(&self) -> ImpactResult<CandidateMode> {
        let mode = self.resolve_candidate_mode()?;
        if let (Some(FilteringMode::Presence), Some(threshold)) =
            (self.filtering_mode, self.im_threshold)
        {
            warn!(
                im_threshold = threshold,
                "presence 模式下不使用 IM_threshold, 已忽略"
            );
        }
        Ok(mode)
    }

    fn resolve_candidate_mode(&self) -> ImpactResult<CandidateMode> {
        match (self.filtering_mode, self.im_threshold) {
            (Some(FilteringMode::Presence), _) | (None, None) => Ok(CandidateMode::Presence),
            (Some(FilteringMode::Threshold), None) => Err(ImpactError::InvalidConfiguration(
                "threshold 模式需要 IM_threshold".to_string(),
            )),
            (_, Some(threshold)) => Ok(CandidateMode::Threshold(threshold)),
        }
    }

    /// 校验配置
    ///
    /// # 错误
    /// - MissingReferenceCoordinates: 设置了距离区间但无参考坐标
    /// - InvalidConfiguration: 区间上下限颠倒 / threshold 模式缺阈值
    pub fn validate(&self) -> ImpactResult<()> {
        if self.distance_enabled() && self.reference_coordinates.is_none() {
            return Err(ImpactError::MissingReferenceCoordinates);
        }
        check_range("magnitude", self.min_magnitude, self.max_magnitude)?;
        check_range("distance", self.min_distance, self.max_distance)?;
        self.resolve_candidate_mode()?;
        Ok(())
    }
}

fn check_range(name: &str, min: Option<f64>, max: Option<f64>) -> ImpactResult<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ImpactError::InvalidConfiguration(format!(
                "min_{} ({}) > max_{} ({})",
                name, min, name, max
            )));
        }
    }
    Ok(())
}

// ==========================================
// "None" 字符串兼容
// ==========================================
#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyOptional<T> {
    Value(T),
    Text(String),
}

fn legacy_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<LegacyOptional<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(LegacyOptional::Value(value)) => Ok(Some(value)),
        Some(LegacyOptional::Text(text)) if text == "None" => Ok(None),
        Some(LegacyOptional::Text(text)) => {
            Err(de::Error::custom(format!("无效的参数值: {}", text)))
        }
    }
}
