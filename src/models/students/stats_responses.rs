use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// 单科及格/不及格人数
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct SubjectPassFail {
    pub pass: i64,
    pub fail: i64,
}

/// 总览统计
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentStats {
    pub total_students: i64,
    pub pass_count: i64,
    pub fail_count: i64,
    pub grade_distribution: BTreeMap<String, i64>,
    pub subject_stats: BTreeMap<String, SubjectPassFail>,
}

/// 单科成绩汇总
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct SubjectAverage {
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
    pub total_students: i64,
    pub max_score: f64,
}

/// 按性别汇总
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct GenderStats {
    pub count: i64,
    pub average: f64,
    pub pass: i64,
}

/// 详细统计
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct DetailedStats {
    pub total_students: i64,
    pub subject_averages: BTreeMap<String, SubjectAverage>,
    // 科目 -> 分数段 -> 人数
    pub score_distribution: BTreeMap<String, BTreeMap<String, i64>>,
    pub gender_stats: BTreeMap<String, GenderStats>,
    pub performance_tiers: BTreeMap<String, i64>,
    pub grade_distribution: BTreeMap<String, i64>,
}
