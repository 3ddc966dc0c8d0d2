// ==========================================
// 集成测试辅助模块
// ==========================================

#![allow(dead_code)]

pub mod log_capture;
pub mod scenario_builder;
