use super::entities::{ClassType, Gender, Grade, Student, Subject};
use crate::models::common::PaginationQuery;
use crate::utils::validate::{validate_max_score, validate_name, validate_score};
use serde::Deserialize;
use ts_rs::TS;

fn zero_score() -> Option<f64> {
    Some(0.0)
}

// 学生创建请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    #[serde(default)]
    pub class_type: ClassType,

    #[serde(default = "zero_score")]
    pub khmer_score: Option<f64>,
    #[serde(default)]
    pub math_score: f64,
    #[serde(default = "zero_score")]
    pub history_score: Option<f64>,
    #[serde(default = "zero_score")]
    pub geography_score: Option<f64>,
    #[serde(default = "zero_score")]
    pub ethics_score: Option<f64>,
    #[serde(default)]
    pub earth_science_score: f64,
    #[serde(default = "zero_score")]
    pub chemistry_score: Option<f64>,
    #[serde(default = "zero_score")]
    pub physics_score: Option<f64>,
    #[serde(default = "zero_score")]
    pub biology_score: Option<f64>,
    #[serde(default = "zero_score")]
    pub physical_education_score: Option<f64>,
    #[serde(default)]
    pub foreign_language_score: f64,

    // khmer / math / history 的满分总是由学科方向决定，这里的值会被覆盖
    #[serde(default)]
    pub khmer_max: Option<f64>,
    #[serde(default)]
    pub math_max: Option<f64>,
    #[serde(default)]
    pub history_max: Option<f64>,
    #[serde(default)]
    pub geography_max: Option<f64>,
    #[serde(default)]
    pub ethics_max: Option<f64>,
    #[serde(default)]
    pub earth_science_max: Option<f64>,
    #[serde(default)]
    pub chemistry_max: Option<f64>,
    #[serde(default)]
    pub physics_max: Option<f64>,
    #[serde(default)]
    pub biology_max: Option<f64>,
    #[serde(default)]
    pub physical_education_max: Option<f64>,
    #[serde(default)]
    pub foreign_language_max: Option<f64>,
}

impl CreateStudentRequest {
    fn scores(&self) -> [(Subject, Option<f64>); 11] {
        [
            (Subject::Khmer, self.khmer_score),
            (Subject::Math, Some(self.math_score)),
            (Subject::History, self.history_score),
            (Subject::Geography, self.geography_score),
            (Subject::Ethics, self.ethics_score),
            (Subject::EarthScience, Some(self.earth_science_score)),
            (Subject::Chemistry, self.chemistry_score),
            (Subject::Physics, self.physics_score),
            (Subject::Biology, self.biology_score),
            (Subject::PhysicalEducation, self.physical_education_score),
            (Subject::ForeignLanguage, Some(self.foreign_language_score)),
        ]
    }

    fn maxima(&self) -> [(Subject, Option<f64>); 11] {
        [
            (Subject::Khmer, self.khmer_max),
            (Subject::Math, self.math_max),
            (Subject::History, self.history_max),
            (Subject::Geography, self.geography_max),
            (Subject::Ethics, self.ethics_max),
            (Subject::EarthScience, self.earth_science_max),
            (Subject::Chemistry, self.chemistry_max),
            (Subject::Physics, self.physics_max),
            (Subject::Biology, self.biology_max),
            (Subject::PhysicalEducation, self.physical_education_max),
            (Subject::ForeignLanguage, self.foreign_language_max),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_name("first_name", &self.first_name)?;
        validate_name("last_name", &self.last_name)?;
        for (subject, score) in self.scores() {
            validate_score(subject.name(), score)?;
        }
        for (subject, max) in self.maxima() {
            validate_max_score(subject.name(), max)?;
        }
        Ok(())
    }

    /// 转换为未入库的学生记录（派生字段尚未计算）
    pub fn into_student(self) -> Student {
        let mut student = Student::new(
            self.first_name.trim(),
            self.last_name.trim(),
            self.gender,
            self.class_type,
        );

        student.khmer_score = self.khmer_score;
        student.math_score = self.math_score;
        student.history_score = self.history_score;
        student.geography_score = self.geography_score;
        student.ethics_score = self.ethics_score;
        student.earth_science_score = self.earth_science_score;
        student.chemistry_score = self.chemistry_score;
        student.physics_score = self.physics_score;
        student.biology_score = self.biology_score;
        student.physical_education_score = self.physical_education_score;
        student.foreign_language_score = self.foreign_language_score;

        // khmer_max / math_max / history_max 保持方向标准值
        student.geography_max = self.geography_max.or(student.geography_max);
        student.ethics_max = self.ethics_max.or(student.ethics_max);
        student.earth_science_max = self.earth_science_max.unwrap_or(student.earth_science_max);
        student.chemistry_max = self.chemistry_max.or(student.chemistry_max);
        student.physics_max = self.physics_max.or(student.physics_max);
        student.biology_max = self.biology_max.or(student.biology_max);
        student.physical_education_max = self
            .physical_education_max
            .or(student.physical_education_max);
        student.foreign_language_max = self
            .foreign_language_max
            .unwrap_or(student.foreign_language_max);

        student
    }
}

// 学生更新请求（满分不可修改）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub class_type: Option<ClassType>,
    pub khmer_score: Option<f64>,
    pub math_score: Option<f64>,
    pub history_score: Option<f64>,
    pub geography_score: Option<f64>,
    pub ethics_score: Option<f64>,
    pub earth_science_score: Option<f64>,
    pub chemistry_score: Option<f64>,
    pub physics_score: Option<f64>,
    pub biology_score: Option<f64>,
    pub physical_education_score: Option<f64>,
    pub foreign_language_score: Option<f64>,
}

impl UpdateStudentRequest {
    fn scores(&self) -> [(Subject, Option<f64>); 11] {
        [
            (Subject::Khmer, self.khmer_score),
            (Subject::Math, self.math_score),
            (Subject::History, self.history_score),
            (Subject::Geography, self.geography_score),
            (Subject::Ethics, self.ethics_score),
            (Subject::EarthScience, self.earth_science_score),
            (Subject::Chemistry, self.chemistry_score),
            (Subject::Physics, self.physics_score),
            (Subject::Biology, self.biology_score),
            (Subject::PhysicalEducation, self.physical_education_score),
            (Subject::ForeignLanguage, self.foreign_language_score),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref first_name) = self.first_name {
            validate_name("first_name", first_name)?;
        }
        if let Some(ref last_name) = self.last_name {
            validate_name("last_name", last_name)?;
        }
        for (subject, score) in self.scores() {
            validate_score(subject.name(), score)?;
        }
        Ok(())
    }

    /// 将提供的字段写入记录，未提供的字段保持不变
    pub fn apply_to(&self, student: &mut Student) {
        if let Some(ref first_name) = self.first_name {
            student.first_name = first_name.trim().to_string();
        }
        if let Some(ref last_name) = self.last_name {
            student.last_name = last_name.trim().to_string();
        }
        if let Some(gender) = self.gender {
            student.gender = gender;
        }
        if let Some(class_type) = self.class_type {
            student.class_type = class_type;
        }
        for (subject, score) in self.scores() {
            if let Some(score) = score {
                student.set_score(subject, score);
            }
        }
    }
}

// 排序方向
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

// 学生查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub grade: Option<String>,
    pub class_type: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl StudentListParams {
    /// 无法识别的 grade / class_type 视为未筛选
    pub fn into_query(self) -> StudentListQuery {
        let (page, page_size) = self.pagination.normalized();
        StudentListQuery {
            page,
            page_size,
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            grade: self.grade.and_then(|g| g.trim().parse::<Grade>().ok()),
            class_type: self
                .class_type
                .and_then(|c| c.trim().parse::<ClassType>().ok()),
            sort_by: self.sort_by.filter(|s| !s.trim().is_empty()),
            sort_order: self.sort_order.unwrap_or_default(),
        }
    }
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct StudentListQuery {
    pub page: u64,
    pub page_size: u64,
    pub search: Option<String>,
    pub grade: Option<Grade>,
    pub class_type: Option<ClassType>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

impl Default for StudentListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            search: None,
            grade: None,
            class_type: None,
            sort_by: None,
            sort_order: SortOrder::Asc,
        }
    }
}

// 统计查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StatsQuery {
    pub class_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(json: &str) -> CreateStudentRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let req = create_request(r#"{"first_name": "Sokha", "last_name": "Chey", "gender": "M"}"#);
        assert_eq!(req.class_type, ClassType::SocialScience);
        assert_eq!(req.khmer_score, Some(0.0));
        assert_eq!(req.math_score, 0.0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_overrides_track_maxima() {
        let req = create_request(
            r#"{"first_name": "Dara", "last_name": "Lim", "gender": "F",
                "class_type": "science", "khmer_max": 200, "math_max": 10,
                "chemistry_max": 60, "foreign_language_max": 40}"#,
        );
        let student = req.into_student();
        assert_eq!(student.khmer_max, Some(75.0));
        assert_eq!(student.math_max, 125.0);
        assert_eq!(student.history_max, Some(50.0));
        assert_eq!(student.chemistry_max, Some(60.0));
        assert_eq!(student.foreign_language_max, 40.0);
        assert_eq!(student.earth_science_max, 50.0);
    }

    #[test]
    fn test_create_rejects_negative_score_and_zero_max() {
        let req = create_request(
            r#"{"first_name": "Dara", "last_name": "Lim", "gender": "F", "math_score": -1}"#,
        );
        assert!(req.validate().is_err());

        let req = create_request(
            r#"{"first_name": "Dara", "last_name": "Lim", "gender": "F", "ethics_max": 0}"#,
        );
        assert!(req.validate().is_err());

        let req = create_request(r#"{"first_name": "  ", "last_name": "Lim", "gender": "F"}"#);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut student = Student::new("Sokha", "Chey", Gender::Male, ClassType::SocialScience);
        student.khmer_score = Some(100.0);

        let update: UpdateStudentRequest =
            serde_json::from_str(r#"{"math_score": 60, "last_name": "Kim"}"#).unwrap();
        assert!(update.validate().is_ok());
        update.apply_to(&mut student);

        assert_eq!(student.math_score, 60.0);
        assert_eq!(student.khmer_score, Some(100.0));
        assert_eq!(student.last_name, "Kim");
        assert_eq!(student.first_name, "Sokha");
    }

    #[test]
    fn test_list_params_ignore_unknown_filters() {
        let params: StudentListParams = serde_json::from_value(serde_json::json!({
            "page": "2",
            "page_size": "500",
            "grade": "Z",
            "class_type": "arts",
            "search": "  ",
        }))
        .unwrap();
        let query = params.into_query();
        assert_eq!(query.page, 2);
        assert_eq!(query.page_size, 100);
        assert!(query.grade.is_none());
        assert!(query.class_type.is_none());
        assert!(query.search.is_none());
        assert_eq!(query.sort_order, SortOrder::Asc);
    }
}
