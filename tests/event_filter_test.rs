// ==========================================
// EventFilter 引擎集成测试
// ==========================================
// 测试目标: 验证三阶段事件筛选 (候选 → 震级 → 距离)
// 覆盖范围: presence/threshold 模式、闭区间、幂等性、错误分类
// ==========================================

mod helpers;

use helpers::log_capture::count_warnings;
use helpers::scenario_builder::*;
use seismic_impact::config::{CandidateMode, FilterConfig, FilteringMode};
use seismic_impact::domain::types::Coordinates;
use seismic_impact::engine::EventFilter;
use seismic_impact::error::{ErrorKind, ImpactError};
use std::collections::BTreeSet;

fn reference() -> Option<Coordinates> {
    Some(Coordinates::new(22.0, 40.0))
}

fn set(ids: &[u32]) -> BTreeSet<u32> {
    ids.iter().copied().collect()
}

/// 站点 1、2 各一个 RC 资产
fn two_site_groups() -> Vec<seismic_impact::domain::AssetGroup> {
    vec![group(
        "RC",
        vec![
            AssetBuilder::new("a1", "RC").resolved(1),
            AssetBuilder::new("a2", "RC").resolved(2),
        ],
    )]
}

// ==========================================
// 测试用例 1: 阶段 1 候选事件
// ==========================================

#[test]
fn test_presence_mode_selects_recorded_events() {
    let catalog = CatalogBuilder::new("PGA")
        .site(1, 22.0, 40.0)
        .site(2, 22.1, 40.0)
        .rupture(1, 5.0, 22.0, 40.0)
        .event(1, 1)
        .event(2, 1)
        .event(3, 1)
        .sample(1, 1, 0.1)
        .sample(1, 2, 0.2)
        .sample(2, 3, 0.3)
        .build();
    let groups = vec![group("RC", vec![AssetBuilder::new("a1", "RC").resolved(1)])];

    let filter =
        EventFilter::new(catalog, single_taxonomy_model(), FilterConfig::default()).unwrap();

    assert_eq!(filter.mode(), CandidateMode::Presence);
    assert_eq!(filter.apply(&groups).unwrap(), set(&[1, 2]));
}

#[test]
fn test_threshold_retains_event_when_any_asset_exceeds() {
    // 同一事件: 两个资产强度 [0.05, 0.20], 阈值 0.1 → 保留
    let catalog = CatalogBuilder::new("PGA")
        .site(1, 22.0, 40.0)
        .site(2, 22.1, 40.0)
        .rupture(1, 5.0, 22.0, 40.0)
        .event(1, 1)
        .event(2, 1)
        .sample(1, 1, 0.05)
        .sample(2, 1, 0.20)
        .sample(1, 2, 0.05)
        .sample(2, 2, 0.08)
        .build();

    let config = FilterConfig {
        im_threshold: Some(0.1),
        ..Default::default()
    };
    let filter = EventFilter::new(catalog, single_taxonomy_model(), config).unwrap();

    assert_eq!(filter.mode(), CandidateMode::Threshold(0.1));
    assert_eq!(filter.apply(&two_site_groups()).unwrap(), set(&[1]));
}

#[test]
fn test_threshold_is_inclusive() {
    let catalog = CatalogBuilder::new("PGA")
        .site(1, 22.0, 40.0)
        .rupture(1, 5.0, 22.0, 40.0)
        .event(1, 1)
        .sample(1, 1, 0.1)
        .build();
    let groups = vec![group("RC", vec![AssetBuilder::new("a1", "RC").resolved(1)])];

    let config = FilterConfig {
        im_threshold: Some(0.1),
        ..Default::default()
    };
    let filter = EventFilter::new(catalog, single_taxonomy_model(), config).unwrap();
    assert_eq!(filter.apply(&groups).unwrap(), set(&[1]));
}

#[test]
fn test_forced_presence_ignores_threshold() {
    let config = FilterConfig {
        im_threshold: Some(10.0),
        filtering_mode: Some(FilteringMode::Presence),
        ..Default::default()
    };
    let filter =
        EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), config).unwrap();

    assert_eq!(filter.mode(), CandidateMode::Presence);
    assert_eq!(filter.apply(&two_site_groups()).unwrap(), set(&[1, 2, 3]));
}

#[test]
fn test_ignored_threshold_warned_once() {
    let config = FilterConfig {
        im_threshold: Some(0.3),
        filtering_mode: Some(FilteringMode::Presence),
        ..Default::default()
    };

    let (filter, warnings) = count_warnings(|| {
        config.validate().unwrap();
        EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), config.clone())
    });

    assert_eq!(filter.unwrap().mode(), CandidateMode::Presence);
    assert_eq!(warnings, 1);
}

#[test]
fn test_forced_threshold_without_value_rejected() {
    let config = FilterConfig {
        filtering_mode: Some(FilteringMode::Threshold),
        ..Default::default()
    };
    let err = EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), config)
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_no_candidates_is_empty_result() {
    let config = FilterConfig {
        im_threshold: Some(5.0),
        ..Default::default()
    };
    let filter =
        EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), config).unwrap();

    let err = filter.apply(&two_site_groups()).unwrap_err();
    assert_eq!(err, ImpactError::NoSurvivingEvents { stage: "candidate" });
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
}

#[test]
fn test_im_type_mismatch_rejected_before_traversal() {
    let model = model(
        3,
        vec![taxonomy("RC", "SA(1.0)", vec![(0.1, tier_two(&["0", "1", "2"]))])],
    );
    let filter = EventFilter::new(three_rupture_catalog(), model, FilterConfig::default()).unwrap();

    let err = filter.apply(&two_site_groups()).unwrap_err();
    assert!(matches!(err, ImpactError::ImTypeMismatch { .. }));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_im_type_compared_case_insensitively() {
    let model = model(3, vec![taxonomy("RC", "pga", vec![(0.1, tier_two(&["0", "1", "2"]))])]);
    let filter = EventFilter::new(three_rupture_catalog(), model, FilterConfig::default()).unwrap();
    assert_eq!(filter.apply(&two_site_groups()).unwrap(), set(&[1, 2, 3]));
}

#[test]
fn test_unresolved_asset_is_integrity_error() {
    let filter = EventFilter::new(
        three_rupture_catalog(),
        single_taxonomy_model(),
        FilterConfig::default(),
    )
    .unwrap();
    let groups = vec![group("RC", vec![AssetBuilder::new("raw", "RC").sites(&[1]).build()])];

    let err = filter.apply(&groups).unwrap_err();
    assert_eq!(err, ImpactError::UnresolvedAsset("raw".to_string()));
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

// ==========================================
// 测试用例 2: 阶段 2 震级区间
// ==========================================

#[test]
fn test_min_magnitude_keeps_larger_ruptures() {
    let config = FilterConfig {
        min_magnitude: Some(5.0),
        ..Default::default()
    };
    let filter =
        EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), config).unwrap();
    assert_eq!(filter.apply(&two_site_groups()).unwrap(), set(&[2, 3]));
}

#[test]
fn test_magnitude_bounds_inclusive() {
    let config = FilterConfig {
        min_magnitude: Some(5.5),
        max_magnitude: Some(6.5),
        ..Default::default()
    };
    let filter =
        EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), config).unwrap();
    assert_eq!(filter.apply(&two_site_groups()).unwrap(), set(&[2, 3]));

    let exact = FilterConfig {
        min_magnitude: Some(4.5),
        max_magnitude: Some(4.5),
        ..Default::default()
    };
    let filter = EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), exact).unwrap();
    assert_eq!(filter.apply(&two_site_groups()).unwrap(), set(&[1]));
}

#[test]
fn test_magnitude_stage_empty_result() {
    let config = FilterConfig {
        min_magnitude: Some(7.0),
        ..Default::default()
    };
    let filter =
        EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), config).unwrap();

    let err = filter.apply(&two_site_groups()).unwrap_err();
    assert_eq!(err, ImpactError::NoSurvivingEvents { stage: "magnitude" });
}

#[test]
fn test_unknown_rupture_is_integrity_error() {
    let catalog = CatalogBuilder::new("PGA")
        .site(1, 22.0, 40.0)
        .rupture(1, 5.0, 22.0, 40.0)
        .event(1, 99)
        .sample(1, 1, 0.2)
        .build();
    let groups = vec![group("RC", vec![AssetBuilder::new("a1", "RC").resolved(1)])];
    let config = FilterConfig {
        min_magnitude: Some(4.0),
        ..Default::default()
    };
    let filter = EventFilter::new(catalog, single_taxonomy_model(), config).unwrap();

    let err = filter.apply(&groups).unwrap_err();
    assert_eq!(
        err,
        ImpactError::UnknownRupture {
            event_id: 1,
            rupture_id: 99
        }
    );
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

// ==========================================
// 测试用例 3: 阶段 3 距离区间
// ==========================================

#[test]
fn test_magnitude_then_distance_leaves_single_event() {
    let config = FilterConfig {
        min_magnitude: Some(5.0),
        max_distance: Some(50.0),
        reference_coordinates: reference(),
        ..Default::default()
    };
    let filter =
        EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), config).unwrap();

    let report = filter.apply_with_report(&two_site_groups()).unwrap();
    assert_eq!(report.candidate_count, 3);
    assert_eq!(report.after_magnitude, Some(2));
    assert_eq!(report.after_distance, Some(1));
    assert_eq!(report.event_ids, set(&[2]));
}

#[test]
fn test_min_distance_excludes_near_ruptures() {
    let config = FilterConfig {
        min_distance: Some(5.0),
        reference_coordinates: reference(),
        ..Default::default()
    };
    let filter =
        EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), config).unwrap();

    let report = filter.apply_with_report(&two_site_groups()).unwrap();
    assert_eq!(report.after_magnitude, None);
    assert_eq!(report.event_ids, set(&[2, 3]));
}

#[test]
fn test_distance_without_reference_rejected() {
    let config = FilterConfig {
        max_distance: Some(50.0),
        ..Default::default()
    };
    let err = EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), config)
        .err()
        .unwrap();
    assert_eq!(err, ImpactError::MissingReferenceCoordinates);
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_distance_stage_empty_result() {
    let config = FilterConfig {
        min_distance: Some(1000.0),
        reference_coordinates: reference(),
        ..Default::default()
    };
    let filter =
        EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), config).unwrap();

    let err = filter.apply(&two_site_groups()).unwrap_err();
    assert_eq!(err, ImpactError::NoSurvivingEvents { stage: "distance" });
}

// ==========================================
// 测试用例 4: 幂等性
// ==========================================

#[test]
fn test_refine_is_idempotent() {
    let config = FilterConfig {
        min_magnitude: Some(5.0),
        max_distance: Some(50.0),
        reference_coordinates: reference(),
        im_threshold: Some(0.2),
        ..Default::default()
    };
    let filter =
        EventFilter::new(three_rupture_catalog(), single_taxonomy_model(), config).unwrap();
    let groups = two_site_groups();

    let first = filter.apply(&groups).unwrap();
    let second = filter.refine(&groups, &first).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_refine_never_expands() {
    let filter = EventFilter::new(
        three_rupture_catalog(),
        single_taxonomy_model(),
        FilterConfig::default(),
    )
    .unwrap();

    let narrowed = filter.refine(&two_site_groups(), &set(&[3, 42])).unwrap();
    assert_eq!(narrowed, set(&[3]));
}
