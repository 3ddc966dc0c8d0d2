// ==========================================
// 地震情景后果模拟 - 情景配置
// ==========================================
// 职责: 灾种、站点匹配方式、事件筛选参数
// 存储: JSON 文件
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::filter_config::FilterConfig;
use crate::error::{ImpactError, ImpactResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// 支持的灾种
pub const SEISMIC_HAZARD: &str = "seismic";

/// 资产到危险性站点的匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SiteMatching {
    /// 暴露站点 ID 与危险性站点 ID 一致, 直接查找
    #[default]
    Direct,
    /// 按大圆距离匹配最近危险性站点
    Geodesic { max_distance_km: f64 },
}

impl SiteMatching {
    /// 校验匹配参数
    ///
    /// # 错误
    /// - InvalidConfiguration: max_distance_km 非有限值或为负
    pub fn validate(&self) -> ImpactResult<()> {
        match *self {
            SiteMatching::Direct => Ok(()),
            SiteMatching::Geodesic { max_distance_km }
                if !max_distance_km.is_finite() || max_distance_km < 0.0 =>
            {
                Err(ImpactError::InvalidConfiguration(format!(
                    "max_distance_km 无效: {}",
                    max_distance_km
                )))
            }
            SiteMatching::Geodesic { .. } => Ok(()),
        }
    }
}

fn default_hazard() -> String {
    SEISMIC_HAZARD.to_string()
}

// ==========================================
// ScenarioConfig - 情景配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_hazard")]
    pub hazard: String,

    #[serde(default)]
    pub site_matching: SiteMatching,

    #[serde(default)]
    pub filter: FilterConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            hazard: default_hazard(),
            site_matching: SiteMatching::default(),
            filter: FilterConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// 从 JSON 字符串加载并校验
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: ScenarioConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载并校验
    ///
    /// # 参数
    /// - path: 配置文件路径
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "加载情景配置");
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// 校验配置
    ///
    /// # 错误
    /// - UnsupportedHazard: 非 seismic 灾种
    /// - Invalid: 筛选参数或匹配距离无效
    pub fn validate(&self) -> ConfigResult<()> {
        if self.hazard != SEISMIC_HAZARD {
            return Err(ConfigError::UnsupportedHazard(self.hazard.clone()));
        }
        self.site_matching.validate()?;
        self.filter.validate()?;
        Ok(())
    }
}
