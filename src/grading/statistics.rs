use std::collections::BTreeMap;

use super::calculator::GradeCalculator;
use crate::models::students::entities::{ClassType, Gender, Grade, Student, Subject};
use crate::models::students::stats_responses::{
    DetailedStats, GenderStats, StudentStats, SubjectAverage, SubjectPassFail,
};

/// 总览统计中逐科统计及格率的科目
const OVERVIEW_SUBJECTS: [Subject; 6] = [
    Subject::Khmer,
    Subject::Math,
    Subject::History,
    Subject::Geography,
    Subject::Ethics,
    Subject::EarthScience,
];

const SCIENCE_DETAIL_SUBJECTS: [Subject; 7] = [
    Subject::Math,
    Subject::Chemistry,
    Subject::Physics,
    Subject::Biology,
    Subject::Khmer,
    Subject::History,
    Subject::ForeignLanguage,
];

const SOCIAL_SCIENCE_DETAIL_SUBJECTS: [Subject; 7] = [
    Subject::Khmer,
    Subject::Math,
    Subject::History,
    Subject::Geography,
    Subject::Ethics,
    Subject::EarthScience,
    Subject::ForeignLanguage,
];

const ALL_DETAIL_SUBJECTS: [Subject; 10] = [
    Subject::Khmer,
    Subject::Math,
    Subject::History,
    Subject::Geography,
    Subject::Ethics,
    Subject::EarthScience,
    Subject::Chemistry,
    Subject::Physics,
    Subject::Biology,
    Subject::ForeignLanguage,
];

const SCORE_BUCKETS: [&str; 4] = ["0-24%", "25-49%", "50-74%", "75-100%"];

const PERFORMANCE_TIERS: [(&str, f64); 5] = [
    ("excellent", 90.0),
    ("good", 75.0),
    ("average", 60.0),
    ("below_average", 50.0),
    ("poor", f64::NEG_INFINITY),
];

/// 学科方向筛选条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackFilter {
    #[default]
    All,
    Track(ClassType),
}

impl TrackFilter {
    /// 无法识别的取值按全部处理
    pub fn parse(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse::<ClassType>().ok())
            .map(TrackFilter::Track)
            .unwrap_or(TrackFilter::All)
    }

    pub fn class_type(&self) -> Option<ClassType> {
        match self {
            TrackFilter::All => None,
            TrackFilter::Track(class_type) => Some(*class_type),
        }
    }

    pub fn matches(&self, student: &Student) -> bool {
        match self {
            TrackFilter::All => true,
            TrackFilter::Track(class_type) => student.class_type == *class_type,
        }
    }

    /// 详细统计中参与汇总的科目
    pub fn subjects(&self) -> &'static [Subject] {
        match self {
            TrackFilter::All => &ALL_DETAIL_SUBJECTS,
            TrackFilter::Track(ClassType::Science) => &SCIENCE_DETAIL_SUBJECTS,
            TrackFilter::Track(ClassType::SocialScience) => &SOCIAL_SCIENCE_DETAIL_SUBJECTS,
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            TrackFilter::All => "students:stats:detailed:all".to_string(),
            TrackFilter::Track(class_type) => format!("students:stats:detailed:{class_type}"),
        }
    }
}

/// 保留两位小数（四舍五入，远离零）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn empty_grade_distribution() -> BTreeMap<String, i64> {
    Grade::ALL
        .iter()
        .map(|grade| (grade.to_string(), 0))
        .collect()
}

fn score_bucket(percentage: f64) -> &'static str {
    if percentage < 25.0 {
        SCORE_BUCKETS[0]
    } else if percentage < 50.0 {
        SCORE_BUCKETS[1]
    } else if percentage < 75.0 {
        SCORE_BUCKETS[2]
    } else {
        SCORE_BUCKETS[3]
    }
}

fn performance_tier(average: f64) -> &'static str {
    PERFORMANCE_TIERS
        .iter()
        .find(|(_, floor)| average >= *floor)
        .map(|(name, _)| *name)
        .unwrap_or("poor")
}

/// 统计聚合器
pub struct StatisticsAggregator<'a> {
    calculator: &'a GradeCalculator,
}

impl<'a> StatisticsAggregator<'a> {
    pub fn new(calculator: &'a GradeCalculator) -> Self {
        Self { calculator }
    }

    /// 总览：及格人数、等级分布与各科及格情况
    pub fn overview(&self, students: &[Student]) -> StudentStats {
        let total_students = students.len() as i64;
        let pass_count = students
            .iter()
            .filter(|s| self.calculator.is_passing(s.grade))
            .count() as i64;

        let mut grade_distribution = empty_grade_distribution();
        for student in students {
            *grade_distribution
                .entry(student.grade.to_string())
                .or_insert(0) += 1;
        }

        let pass_percentage = self.calculator.policy().subject_pass_percentage;
        let mut subject_stats: BTreeMap<String, SubjectPassFail> = OVERVIEW_SUBJECTS
            .iter()
            .map(|subject| (subject.name().to_string(), SubjectPassFail::default()))
            .collect();

        for student in students {
            for subject in OVERVIEW_SUBJECTS {
                let Some(max) = student.max_of(subject).filter(|m| *m > 0.0) else {
                    continue;
                };
                let score = student.score_of(subject).unwrap_or(0.0);
                let entry = subject_stats
                    .entry(subject.name().to_string())
                    .or_default();
                if score / max * 100.0 >= pass_percentage {
                    entry.pass += 1;
                } else {
                    entry.fail += 1;
                }
            }
        }

        StudentStats {
            total_students,
            pass_count,
            fail_count: total_students - pass_count,
            grade_distribution,
            subject_stats,
        }
    }

    /// 详细统计：各科均分、分数段、性别与表现分层
    pub fn detailed(&self, students: &[Student], filter: TrackFilter) -> DetailedStats {
        let students: Vec<&Student> = students.iter().filter(|s| filter.matches(s)).collect();
        if students.is_empty() {
            return DetailedStats::default();
        }

        let mut subject_averages = BTreeMap::new();
        let mut score_distribution = BTreeMap::new();

        for &subject in filter.subjects() {
            // (成绩, 满分)，满分缺失或不为正的记录不参与该科统计
            let samples: Vec<(f64, f64)> = students
                .iter()
                .filter_map(|s| {
                    let max = s.max_of(subject).filter(|m| *m > 0.0)?;
                    Some((s.score_of(subject).unwrap_or(0.0), max))
                })
                .collect();

            let Some(&(_, reference_max)) = samples.first() else {
                continue;
            };

            let count = samples.len();
            let sum: f64 = samples.iter().map(|(score, _)| score).sum();
            let highest = samples
                .iter()
                .map(|(score, _)| *score)
                .fold(f64::NEG_INFINITY, f64::max);
            let lowest = samples
                .iter()
                .map(|(score, _)| *score)
                .fold(f64::INFINITY, f64::min);

            subject_averages.insert(
                subject.name().to_string(),
                SubjectAverage {
                    average: round2(sum / count as f64),
                    highest: round2(highest),
                    lowest: round2(lowest),
                    total_students: count as i64,
                    max_score: reference_max,
                },
            );

            let mut buckets: BTreeMap<String, i64> = SCORE_BUCKETS
                .iter()
                .map(|bucket| (bucket.to_string(), 0))
                .collect();
            for (score, _) in &samples {
                let bucket = score_bucket(score / reference_max * 100.0);
                *buckets.entry(bucket.to_string()).or_insert(0) += 1;
            }
            score_distribution.insert(subject.name().to_string(), buckets);
        }

        let mut gender_stats = BTreeMap::new();
        for gender in [Gender::Male, Gender::Female] {
            let group: Vec<&&Student> = students.iter().filter(|s| s.gender == gender).collect();
            let mut stats = GenderStats::default();
            if !group.is_empty() {
                let sum: f64 = group.iter().map(|s| s.average_score).sum();
                stats.count = group.len() as i64;
                stats.average = round2(sum / group.len() as f64);
                stats.pass = group
                    .iter()
                    .filter(|s| self.calculator.is_passing(s.grade))
                    .count() as i64;
            }
            gender_stats.insert(gender.stats_key().to_string(), stats);
        }

        let mut performance_tiers: BTreeMap<String, i64> = PERFORMANCE_TIERS
            .iter()
            .map(|(name, _)| (name.to_string(), 0))
            .collect();
        let mut grade_distribution = empty_grade_distribution();
        for student in &students {
            *performance_tiers
                .entry(performance_tier(student.average_score).to_string())
                .or_insert(0) += 1;
            *grade_distribution
                .entry(student.grade.to_string())
                .or_insert(0) += 1;
        }

        DetailedStats {
            total_students: students.len() as i64,
            subject_averages,
            score_distribution,
            gender_stats,
            performance_tiers,
            grade_distribution,
        }
    }
}
