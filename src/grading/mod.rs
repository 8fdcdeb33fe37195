//! 成绩计算与统计
//!
//! - `policy`: 可配置的评分策略
//! - `calculator`: 总分、平均分与等级计算
//! - `statistics`: 面向学生群体的统计聚合

pub mod calculator;
pub mod policy;
pub mod statistics;

pub use calculator::{GradeCalculator, MaxScoreMismatch};
pub use policy::{GradeThresholds, GradingPolicy};
pub use statistics::{StatisticsAggregator, TrackFilter, round2};
