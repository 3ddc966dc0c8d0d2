// ==========================================
// 地震情景后果模拟 - 大圆距离
// ==========================================
// 职责: 球面大圆距离 (haversine), 单位 km
// 红线: 无状态、无副作用
// ==========================================

use crate::domain::types::Coordinates;

/// 地球平均半径 (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// 两点间大圆距离 (km)
pub fn great_circle_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // 浮点误差可能使 h 略大于 1
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}
