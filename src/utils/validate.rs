use once_cell::sync::Lazy;
use regex::Regex;

// 允许各语言文字（含高棉文组合符号）、空格、撇号、点和连字符
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{M}\s'.-]+$").expect("Invalid name regex"));

const MAX_NAME_CHARS: usize = 100;

pub fn validate_name(field: &str, name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(format!(
            "{field} must be at most {MAX_NAME_CHARS} characters"
        ));
    }
    if !NAME_RE.is_match(name) {
        return Err(format!(
            "{field} may only contain letters, spaces, apostrophes, dots or hyphens"
        ));
    }
    Ok(())
}

/// 成绩必须是非负有限数，None 表示未提供
pub fn validate_score(field: &str, score: Option<f64>) -> Result<(), String> {
    match score {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(format!("{field} score must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

/// 满分必须为正数，None 表示使用默认值
pub fn validate_max_score(field: &str, max: Option<f64>) -> Result<(), String> {
    match max {
        Some(value) if !value.is_finite() || value <= 0.0 => {
            Err(format!("{field} max score must be greater than 0"))
        }
        _ => Ok(()),
    }
}
