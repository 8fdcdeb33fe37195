use serde::Serialize;

use super::policy::GradingPolicy;
use crate::models::students::entities::{Grade, Student, Subject};

/// 满分与学科方向标准值不一致的科目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxScoreMismatch {
    pub subject: Subject,
    pub expected: f64,
    pub actual: Option<f64>,
}

impl std::fmt::Display for MaxScoreMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.actual {
            Some(actual) => write!(
                f,
                "{} max is {actual}, expected {}",
                self.subject, self.expected
            ),
            None => write!(f, "{} max is missing, expected {}", self.subject, self.expected),
        }
    }
}

/// 成绩计算器
///
/// 所有方法都是纯函数，只依赖注入的 [`GradingPolicy`]。
#[derive(Debug, Clone, Default)]
pub struct GradeCalculator {
    policy: GradingPolicy,
}

impl GradeCalculator {
    pub fn new(policy: GradingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &GradingPolicy {
        &self.policy
    }

    /// 外语加分：仅超过中位线的部分计入
    pub fn foreign_language_bonus(&self, score: f64) -> f64 {
        (score - self.policy.foreign_language_midpoint).max(0.0)
    }

    /// 总分 = 方向内各科成绩（缺失按 0 计）+ 外语加分
    pub fn total_score(&self, student: &Student) -> f64 {
        let subjects: f64 = student
            .class_type
            .active_subjects()
            .map(|subject| student.score_of(subject).unwrap_or(0.0))
            .sum();
        subjects + self.foreign_language_bonus(student.foreign_language_score)
    }

    /// 理论最高分，缺失的满分按方向默认值计
    pub fn max_possible_score(&self, student: &Student) -> f64 {
        let track = student.class_type;
        let subjects: f64 = track
            .active_subjects()
            .map(|subject| {
                student
                    .max_of(subject)
                    .unwrap_or_else(|| track.default_max(subject))
            })
            .sum();
        subjects + self.policy.max_foreign_language_bonus()
    }

    /// 平均分（百分比），分母固定为 reference_total，上限 100
    pub fn average(&self, student: &Student) -> f64 {
        self.average_for_total(self.total_score(student))
    }

    fn average_for_total(&self, total: f64) -> f64 {
        let reference = self.policy.reference_total;
        if total >= reference {
            100.0
        } else {
            total / reference * 100.0
        }
    }

    pub fn grade_for_average(&self, average: f64) -> Grade {
        let t = &self.policy.thresholds;
        if average >= t.a {
            Grade::A
        } else if average >= t.b {
            Grade::B
        } else if average >= t.c {
            Grade::C
        } else if average >= t.d {
            Grade::D
        } else if average >= t.e {
            Grade::E
        } else {
            Grade::F
        }
    }

    pub fn grade(&self, student: &Student) -> Grade {
        self.grade_for_average(self.average(student))
    }

    pub fn is_passing(&self, grade: Grade) -> bool {
        grade != Grade::F
    }

    /// 重新计算并写入 total_score / average_score / grade
    pub fn apply(&self, student: &mut Student) {
        let total = self.total_score(student);
        let average = self.average_for_total(total);
        student.total_score = total;
        student.average_score = average;
        student.grade = self.grade_for_average(average);
    }

    /// 列出方向内满分与标准值不一致的科目
    pub fn check_track_maxima(&self, student: &Student) -> Vec<MaxScoreMismatch> {
        student
            .class_type
            .subject_table()
            .iter()
            .filter_map(|&(subject, expected)| {
                let actual = student.max_of(subject);
                if actual == Some(expected) {
                    None
                } else {
                    Some(MaxScoreMismatch {
                        subject,
                        expected,
                        actual,
                    })
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::policy::GradeThresholds;
    use crate::models::students::entities::{ClassType, Gender};

    fn social(scores: [f64; 6], foreign_language: f64) -> Student {
        let mut s = Student::new("Sokha", "Chey", Gender::Male, ClassType::SocialScience);
        s.khmer_score = Some(scores[0]);
        s.math_score = scores[1];
        s.history_score = Some(scores[2]);
        s.geography_score = Some(scores[3]);
        s.ethics_score = Some(scores[4]);
        s.earth_science_score = scores[5];
        s.foreign_language_score = foreign_language;
        s
    }

    fn science(scores: [f64; 6], foreign_language: f64) -> Student {
        let mut s = Student::new("Dara", "Lim", Gender::Female, ClassType::Science);
        s.math_score = scores[0];
        s.chemistry_score = Some(scores[1]);
        s.physics_score = Some(scores[2]);
        s.biology_score = Some(scores[3]);
        s.khmer_score = Some(scores[4]);
        s.history_score = Some(scores[5]);
        s.foreign_language_score = foreign_language;
        s
    }

    #[test]
    fn test_foreign_language_bonus() {
        let calc = GradeCalculator::default();
        assert_eq!(calc.foreign_language_bonus(0.0), 0.0);
        assert_eq!(calc.foreign_language_bonus(25.0), 0.0);
        assert_eq!(calc.foreign_language_bonus(26.0), 1.0);
        assert_eq!(calc.foreign_language_bonus(30.0), 5.0);
        assert_eq!(calc.foreign_language_bonus(40.0), 15.0);
        assert_eq!(calc.foreign_language_bonus(50.0), 25.0);
        // 刚超过中点即开始加分
        assert!((calc.foreign_language_bonus(25.01) - 0.01).abs() < 1e-9);
        assert_eq!(calc.foreign_language_bonus(24.99), 0.0);
    }

    #[test]
    fn test_all_zero_science_fails() {
        let calc = GradeCalculator::default();
        let mut s = science([0.0; 6], 0.0);
        calc.apply(&mut s);
        assert_eq!(s.total_score, 0.0);
        assert_eq!(s.average_score, 0.0);
        assert_eq!(s.grade, Grade::F);
        assert!(!calc.is_passing(s.grade));
    }

    #[test]
    fn test_social_science_total_and_grade() {
        let calc = GradeCalculator::default();
        let mut s = social([100.0, 60.0, 60.0, 60.0, 60.0, 40.0], 30.0);
        assert_eq!(calc.total_score(&s), 385.0);

        calc.apply(&mut s);
        assert_eq!(s.total_score, 385.0);
        assert!((s.average_score - 81.052_631_578_947_37).abs() < 1e-9);
        assert_eq!(s.grade, Grade::B);
    }

    #[test]
    fn test_science_ignores_social_subjects() {
        let calc = GradeCalculator::default();
        let mut s = science([110.0, 70.0, 70.0, 70.0, 70.0, 45.0], 20.0);
        s.geography_score = Some(75.0);
        s.earth_science_score = 50.0;
        assert_eq!(calc.total_score(&s), 435.0);

        calc.apply(&mut s);
        assert!((s.average_score - 91.578_947_368_421_05).abs() < 1e-9);
        assert_eq!(s.grade, Grade::A);
    }

    #[test]
    fn test_average_capped_at_reference_total() {
        let calc = GradeCalculator::default();
        let mut s = social([125.0, 75.0, 75.0, 75.0, 75.0, 50.0], 50.0);
        calc.apply(&mut s);
        assert_eq!(s.total_score, 500.0);
        assert_eq!(s.average_score, 100.0);
        assert_eq!(s.grade, Grade::A);

        let exact = social([125.0, 75.0, 75.0, 75.0, 75.0, 50.0], 0.0);
        assert_eq!(calc.average(&exact), 100.0);
    }

    #[test]
    fn test_missing_scores_count_as_zero() {
        let calc = GradeCalculator::default();
        let mut s = Student::new("Vibol", "Kim", Gender::Male, ClassType::SocialScience);
        s.math_score = 50.0;
        assert_eq!(calc.total_score(&s), 50.0);

        calc.apply(&mut s);
        assert_eq!(s.grade, Grade::F);
        assert!(!calc.is_passing(s.grade));
    }

    #[test]
    fn test_grade_boundaries_inclusive() {
        let calc = GradeCalculator::default();
        assert_eq!(calc.grade_for_average(90.0), Grade::A);
        assert_eq!(calc.grade_for_average(89.999), Grade::B);
        assert_eq!(calc.grade_for_average(80.0), Grade::B);
        assert_eq!(calc.grade_for_average(70.0), Grade::C);
        assert_eq!(calc.grade_for_average(60.0), Grade::D);
        assert_eq!(calc.grade_for_average(50.0), Grade::E);
        assert_eq!(calc.grade_for_average(49.99), Grade::F);
        assert_eq!(calc.grade_for_average(0.0), Grade::F);

        for grade in [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E] {
            assert!(calc.is_passing(grade));
        }
    }

    #[test]
    fn test_total_for_boundary_averages() {
        let calc = GradeCalculator::default();
        // 427.5 / 475 = 90%
        let s = social([125.0, 75.0, 75.0, 75.0, 52.5, 25.0], 0.0);
        assert_eq!(calc.total_score(&s), 427.5);
        assert!((calc.average(&s) - 90.0).abs() < 1e-9);

        // 237.5 / 475 = 50%
        let s = social([50.0, 37.5, 37.5, 37.5, 50.0, 25.0], 0.0);
        assert_eq!(calc.grade(&s), Grade::E);
    }

    #[test]
    fn test_max_possible_score() {
        let calc = GradeCalculator::default();
        let s = social([0.0; 6], 0.0);
        assert_eq!(calc.max_possible_score(&s), 500.0);

        let mut s = science([0.0; 6], 0.0);
        assert_eq!(calc.max_possible_score(&s), 500.0);

        // 缺失的满分按方向默认值补齐
        s.khmer_max = None;
        s.history_max = None;
        assert_eq!(calc.max_possible_score(&s), 500.0);

        s.chemistry_max = Some(100.0);
        assert_eq!(calc.max_possible_score(&s), 525.0);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let calc = GradeCalculator::default();
        let mut s = science([90.0, 50.0, 50.0, 50.0, 50.0, 30.0], 35.0);
        calc.apply(&mut s);
        let first = s.clone();
        calc.apply(&mut s);
        assert_eq!(first, s);
    }

    #[test]
    fn test_custom_policy_shifts_grades() {
        let policy = GradingPolicy {
            thresholds: GradeThresholds {
                a: 80.0,
                b: 70.0,
                c: 60.0,
                d: 50.0,
                e: 40.0,
            },
            ..GradingPolicy::default()
        };
        let strict = GradeCalculator::default();
        let lenient = GradeCalculator::new(policy);

        let s = social([100.0, 60.0, 60.0, 60.0, 60.0, 40.0], 30.0);
        assert_eq!(strict.grade(&s), Grade::B);
        assert_eq!(lenient.grade(&s), Grade::A);
        assert_eq!(lenient.grade_for_average(45.0), Grade::E);
    }

    #[test]
    fn test_custom_reference_total_and_midpoint() {
        let policy = GradingPolicy {
            reference_total: 500.0,
            foreign_language_midpoint: 20.0,
            ..GradingPolicy::default()
        };
        let calc = GradeCalculator::new(policy);
        let s = social([100.0, 50.0, 50.0, 50.0, 50.0, 50.0], 30.0);
        assert_eq!(calc.total_score(&s), 360.0);
        assert!((calc.average(&s) - 72.0).abs() < 1e-9);
        assert_eq!(calc.max_possible_score(&s), 505.0);
    }

    #[test]
    fn test_check_track_maxima() {
        let calc = GradeCalculator::default();
        let s = social([0.0; 6], 0.0);
        assert!(calc.check_track_maxima(&s).is_empty());

        // 理科记录沿用了文科的满分
        let mut s = science([0.0; 6], 0.0);
        s.math_max = 75.0;
        s.khmer_max = Some(125.0);
        s.history_max = None;
        let mismatches = calc.check_track_maxima(&s);
        let subjects: Vec<_> = mismatches.iter().map(|m| m.subject).collect();
        assert_eq!(subjects, vec![Subject::Math, Subject::Khmer, Subject::History]);
        assert_eq!(mismatches[0].expected, 125.0);
        assert_eq!(mismatches[2].actual, None);
        assert_eq!(mismatches[0].to_string(), "math max is 75, expected 125");
    }
}
