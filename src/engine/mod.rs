// ==========================================
// 地震情景后果模拟 - 引擎层
// ==========================================
// 职责: 资产解析、事件筛选、后果计算、结果汇总
// 红线: 引擎只读共享目录与后果模型, 不做文件读写
// 红线: 任一错误终止整次运行, 不返回部分结果
// ==========================================

pub mod aggregator;
pub mod consequence_core;
pub mod consequence_engine;
pub mod event_filter;
pub mod exposure_index;
pub mod geo;
pub mod orchestrator;
pub mod permutation;

// 重导出核心引擎
pub use aggregator::{most_frequent, ConsequenceAggregator, DamageStateSummaries};
pub use consequence_core::ConsequenceCore;
pub use consequence_engine::ConsequenceEngine;
pub use event_filter::{EventFilter, FilterReport};
pub use exposure_index::ExposureIndex;
pub use geo::{great_circle_km, EARTH_RADIUS_KM};
pub use orchestrator::{ScenarioOrchestrator, ScenarioOutcome};
pub use permutation::{reindex, seed_for_position, seeded_permutation, SHUFFLE_ALGORITHM};
