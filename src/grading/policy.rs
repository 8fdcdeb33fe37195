use serde::{Deserialize, Serialize};

/// 等级分数线（平均分下限，含边界）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GradeThresholds {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self {
            a: 90.0,
            b: 80.0,
            c: 70.0,
            d: 60.0,
            e: 50.0,
        }
    }
}

/// 评分策略
///
/// 对应配置文件中的 `[grading]` 段，缺省值即学校现行规则。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GradingPolicy {
    pub thresholds: GradeThresholds,
    /// 计算平均分时的固定分母
    pub reference_total: f64,
    /// 外语超过该分数的部分计入总分
    pub foreign_language_midpoint: f64,
    pub foreign_language_max: f64,
    /// 单科及格线（百分比）
    pub subject_pass_percentage: f64,
    /// 为 true 时拒绝满分与学科方向标准值不一致的记录
    pub enforce_track_maxima: bool,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            thresholds: GradeThresholds::default(),
            reference_total: 475.0,
            foreign_language_midpoint: 25.0,
            foreign_language_max: 50.0,
            subject_pass_percentage: 50.0,
            enforce_track_maxima: false,
        }
    }
}

impl GradingPolicy {
    /// 外语可获得的最高加分
    pub fn max_foreign_language_bonus(&self) -> f64 {
        (self.foreign_language_max - self.foreign_language_midpoint).max(0.0)
    }

    pub fn validate(&self) -> Result<(), String> {
        let t = &self.thresholds;
        let bands = [t.a, t.b, t.c, t.d, t.e];
        if bands.iter().any(|v| !v.is_finite() || *v < 0.0 || *v > 100.0) {
            return Err("grade thresholds must be within 0..=100".to_string());
        }
        if bands.windows(2).any(|w| w[0] <= w[1]) {
            return Err("grade thresholds must be strictly descending from A to E".to_string());
        }
        if !self.reference_total.is_finite() || self.reference_total <= 0.0 {
            return Err("reference_total must be positive".to_string());
        }
        if !self.foreign_language_midpoint.is_finite() || self.foreign_language_midpoint < 0.0 {
            return Err("foreign_language_midpoint must not be negative".to_string());
        }
        if !self.foreign_language_max.is_finite()
            || self.foreign_language_max < self.foreign_language_midpoint
        {
            return Err("foreign_language_max must not be below the midpoint".to_string());
        }
        if !(0.0..=100.0).contains(&self.subject_pass_percentage) {
            return Err("subject_pass_percentage must be within 0..=100".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        let policy = GradingPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.max_foreign_language_bonus(), 25.0);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let policy: GradingPolicy =
            serde_json::from_str(r#"{"thresholds": {"a": 95.0}, "enforce_track_maxima": true}"#)
                .unwrap();
        assert_eq!(policy.thresholds.a, 95.0);
        assert_eq!(policy.thresholds.b, 80.0);
        assert_eq!(policy.reference_total, 475.0);
        assert!(policy.enforce_track_maxima);
    }

    #[test]
    fn test_invalid_policies_rejected() {
        let mut policy = GradingPolicy::default();
        policy.thresholds.c = 85.0;
        assert!(policy.validate().is_err());

        let mut policy = GradingPolicy::default();
        policy.reference_total = 0.0;
        assert!(policy.validate().is_err());

        let mut policy = GradingPolicy::default();
        policy.foreign_language_max = 10.0;
        assert!(policy.validate().is_err());

        let mut policy = GradingPolicy::default();
        policy.subject_pass_percentage = 120.0;
        assert!(policy.validate().is_err());
    }
}
