// ==========================================
// 地震情景后果模拟 - 危险性目录
// ==========================================
// 职责: 站点、破裂、事件、地震动样本 + 只读索引
// 红线: 加载后只读, 任何引擎不得修改
// ==========================================

use crate::domain::types::{im_type_matches, Coordinates, EventId, RuptureId, SiteId};
use crate::error::{ImpactError, ImpactResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// 基础实体
// ==========================================

/// 危险性网格站点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardSite {
    pub id: SiteId,
    pub lon: f64,
    pub lat: f64,
}

impl HazardSite {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lon, self.lat)
    }
}

/// 震源位置 (深度可缺失)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hypocenter {
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub depth: Option<f64>,
}

/// 破裂: 一次模拟震源(一个震级, 一个震源位置)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rupture {
    pub id: RuptureId,
    pub magnitude: f64,
    pub hypocenter: Hypocenter,
}

/// 事件: 破裂的一次实现
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub rupture_id: RuptureId,
}

/// 地震动样本: 站点在某事件下的强度值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundMotionSample {
    pub site_id: SiteId,
    pub event_id: EventId,
    pub intensity_value: f64,
    pub im_type: String,
}

// ==========================================
// HazardCatalog - 危险性目录
// ==========================================
// 多条带数据: 同一 (site, event) 出现多条样本时取第一条
#[derive(Debug, Clone)]
pub struct HazardCatalog {
    im_type: String,
    sites: Vec<HazardSite>,
    ruptures: Vec<Rupture>,
    events: Vec<Event>,

    // 索引
    intensity_index: HashMap<(SiteId, EventId), f64>,
    site_events: HashMap<SiteId, Vec<(EventId, f64)>>,
    event_index: HashMap<EventId, usize>,
    rupture_index: HashMap<RuptureId, usize>,
}

impl HazardCatalog {
    /// 构建危险性目录并建立索引
    ///
    /// # 错误
    /// - SampleImTypeMismatch: 样本的 IM 类型与目录 IM 类型不一致
    pub fn new(
        im_type: impl Into<String>,
        sites: Vec<HazardSite>,
        ruptures: Vec<Rupture>,
        events: Vec<Event>,
        samples: Vec<GroundMotionSample>,
    ) -> ImpactResult<Self> {
        let im_type = im_type.into();

        let mut intensity_index = HashMap::with_capacity(samples.len());
        let mut site_events: HashMap<SiteId, Vec<(EventId, f64)>> = HashMap::new();

        for sample in &samples {
            if !im_type_matches(&sample.im_type, &im_type) {
                return Err(ImpactError::SampleImTypeMismatch {
                    site_id: sample.site_id,
                    event_id: sample.event_id,
                    sample: sample.im_type.clone(),
                    catalog: im_type.clone(),
                });
            }

            let key = (sample.site_id, sample.event_id);
            if intensity_index.contains_key(&key) {
                continue;
            }
            intensity_index.insert(key, sample.intensity_value);
            site_events
                .entry(sample.site_id)
                .or_default()
                .push((sample.event_id, sample.intensity_value));
        }

        let event_index = events
            .iter()
            .enumerate()
            .map(|(idx, event)| (event.id, idx))
            .collect();
        let rupture_index = ruptures
            .iter()
            .enumerate()
            .map(|(idx, rupture)| (rupture.id, idx))
            .collect();

        Ok(Self {
            im_type,
            sites,
            ruptures,
            events,
            intensity_index,
            site_events,
            event_index,
            rupture_index,
        })
    }

    /// 构建均匀强度场: 单事件(ID=1)、单破裂(ID=1), 所有站点强度相同
    ///
    /// # 用途
    /// - 只已知一个 IM 值时的情景评估(无需事件筛选)
    pub fn uniform_field(
        im_type: impl Into<String>,
        im_value: f64,
        magnitude: f64,
        rupture_lon: f64,
        rupture_lat: f64,
        sites: Vec<HazardSite>,
    ) -> ImpactResult<Self> {
        let im_type = im_type.into();
        let rupture = Rupture {
            id: 1,
            magnitude,
            hypocenter: Hypocenter {
                lon: rupture_lon,
                lat: rupture_lat,
                depth: None,
            },
        };
        let event = Event {
            id: 1,
            rupture_id: 1,
        };
        let samples = sites
            .iter()
            .map(|site| GroundMotionSample {
                site_id: site.id,
                event_id: 1,
                intensity_value: im_value,
                im_type: im_type.clone(),
            })
            .collect();

        Self::new(im_type, sites, vec![rupture], vec![event], samples)
    }

    pub fn im_type(&self) -> &str {
        &self.im_type
    }

    pub fn sites(&self) -> &[HazardSite] {
        &self.sites
    }

    pub fn ruptures(&self) -> &[Rupture] {
        &self.ruptures
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// 查询 (site, event) 的强度值
    pub fn intensity(&self, site_id: SiteId, event_id: EventId) -> Option<f64> {
        self.intensity_index.get(&(site_id, event_id)).copied()
    }

    /// 站点上记录的所有 (事件, 强度值), 按记录顺序
    pub fn events_at_site(&self, site_id: SiteId) -> &[(EventId, f64)] {
        self.site_events
            .get(&site_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn event(&self, event_id: EventId) -> Option<&Event> {
        self.event_index.get(&event_id).map(|&idx| &self.events[idx])
    }

    pub fn rupture(&self, rupture_id: RuptureId) -> Option<&Rupture> {
        self.rupture_index
            .get(&rupture_id)
            .map(|&idx| &self.ruptures[idx])
    }

    /// 查询事件对应的破裂
    ///
    /// # 错误
    /// - UnknownEvent: 事件不在目录中
    /// - UnknownRupture: 事件引用的破裂不存在
    pub fn rupture_of_event(&self, event_id: EventId) -> ImpactResult<&Rupture> {
        let event = self
            .event(event_id)
            .ok_or(ImpactError::UnknownEvent(event_id))?;
        self.rupture(event.rupture_id)
            .ok_or(ImpactError::UnknownRupture {
                event_id,
                rupture_id: event.rupture_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample(site_id: SiteId, event_id: EventId, value: f64) -> GroundMotionSample {
        GroundMotionSample {
            site_id,
            event_id,
            intensity_value: value,
            im_type: "PGA".to_string(),
        }
    }

    #[test]
    fn test_first_sample_wins_for_multi_stripe() {
        let catalog = HazardCatalog::new(
            "PGA",
            vec![],
            vec![],
            vec![],
            vec![sample(1, 10, 0.3), sample(1, 10, 0.9), sample(2, 10, 0.1)],
        )
        .unwrap();

        assert_eq!(catalog.intensity(1, 10), Some(0.3));
        assert_eq!(catalog.events_at_site(1), &[(10, 0.3)]);
        assert_eq!(catalog.intensity(3, 10), None);
        assert!(catalog.events_at_site(3).is_empty());
    }

    #[test]
    fn test_sample_im_type_mismatch_rejected() {
        let mut bad = sample(1, 10, 0.3);
        bad.im_type = "SA(1.0)".to_string();
        let err = HazardCatalog::new("pga", vec![], vec![], vec![], vec![bad]).unwrap_err();
        assert_eq!(
            err,
            ImpactError::SampleImTypeMismatch {
                site_id: 1,
                event_id: 10,
                sample: "SA(1.0)".to_string(),
                catalog: "pga".to_string(),
            }
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_rupture_of_event_unknown_rupture() {
        let catalog = HazardCatalog::new(
            "PGA",
            vec![],
            vec![],
            vec![Event {
                id: 5,
                rupture_id: 99,
            }],
            vec![],
        )
        .unwrap();

        let err = catalog.rupture_of_event(5).unwrap_err();
        assert_eq!(
            err,
            ImpactError::UnknownRupture {
                event_id: 5,
                rupture_id: 99
            }
        );
        assert_eq!(catalog.rupture_of_event(6).unwrap_err(), ImpactError::UnknownEvent(6));
    }

    #[test]
    fn test_uniform_field_covers_every_site() {
        let sites = vec![
            HazardSite { id: 1, lon: 22.9, lat: 40.6 },
            HazardSite { id: 2, lon: 23.0, lat: 40.7 },
        ];
        let catalog = HazardCatalog::uniform_field("PGA", 0.25, 6.1, 22.95, 40.65, sites).unwrap();

        assert_eq!(catalog.events().len(), 1);
        assert_eq!(catalog.intensity(1, 1), Some(0.25));
        assert_eq!(catalog.intensity(2, 1), Some(0.25));
        let rupture = catalog.rupture_of_event(1).unwrap();
        assert_eq!(rupture.magnitude, 6.1);
        assert_eq!(rupture.hypocenter.depth, None);
    }
}
