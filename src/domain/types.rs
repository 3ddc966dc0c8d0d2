// ==========================================
// 地震情景后果模拟 - 领域类型定义
// ==========================================
// 职责: 标识符别名、资产类型、地理坐标
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 危险性网格站点 ID
pub type SiteId = u32;

/// 事件 ID (一次地震动实现)
pub type EventId = u32;

/// 破裂 ID
pub type RuptureId = u32;

// ==========================================
// 资产类型 (Asset Type)
// ==========================================
// 序列化格式: 小写 (与暴露模型一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Point,  // 点状资产(建筑、桥梁)
    Area,   // 面状资产
    Linear, // 线状资产(道路、管线)
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Point => write!(f, "point"),
            AssetType::Area => write!(f, "area"),
            AssetType::Linear => write!(f, "linear"),
        }
    }
}

// ==========================================
// 地理坐标 (WGS84 经纬度, 单位: 度)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinates {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lon, self.lat)
    }
}

/// IM 类型比较 (大小写不敏感, 例如 "PGA" 与 "pga")
pub fn im_type_matches(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}
