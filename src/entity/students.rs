//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub class_type: String,

    pub khmer_score: Option<f64>,
    pub math_score: f64,
    pub history_score: Option<f64>,
    pub geography_score: Option<f64>,
    pub ethics_score: Option<f64>,
    pub earth_science_score: f64,
    pub chemistry_score: Option<f64>,
    pub physics_score: Option<f64>,
    pub biology_score: Option<f64>,
    pub physical_education_score: Option<f64>,
    pub foreign_language_score: f64,

    pub khmer_max: Option<f64>,
    pub math_max: f64,
    pub history_max: Option<f64>,
    pub geography_max: Option<f64>,
    pub ethics_max: Option<f64>,
    pub earth_science_max: f64,
    pub chemistry_max: Option<f64>,
    pub physics_max: Option<f64>,
    pub biology_max: Option<f64>,
    pub physical_education_max: Option<f64>,
    pub foreign_language_max: f64,

    pub total_score: f64,
    pub average_score: f64,
    pub grade: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::{ClassType, Gender, Grade, Student};
        use chrono::{DateTime, Utc};

        Student {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            gender: self.gender.parse::<Gender>().unwrap_or(Gender::Male),
            class_type: self
                .class_type
                .parse::<ClassType>()
                .unwrap_or(ClassType::SocialScience),
            khmer_score: self.khmer_score,
            math_score: self.math_score,
            history_score: self.history_score,
            geography_score: self.geography_score,
            ethics_score: self.ethics_score,
            earth_science_score: self.earth_science_score,
            chemistry_score: self.chemistry_score,
            physics_score: self.physics_score,
            biology_score: self.biology_score,
            physical_education_score: self.physical_education_score,
            foreign_language_score: self.foreign_language_score,
            khmer_max: self.khmer_max,
            math_max: self.math_max,
            history_max: self.history_max,
            geography_max: self.geography_max,
            ethics_max: self.ethics_max,
            earth_science_max: self.earth_science_max,
            chemistry_max: self.chemistry_max,
            physics_max: self.physics_max,
            biology_max: self.biology_max,
            physical_education_max: self.physical_education_max,
            foreign_language_max: self.foreign_language_max,
            total_score: self.total_score,
            average_score: self.average_score,
            grade: self.grade.parse::<Grade>().unwrap_or(Grade::F),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

impl ActiveModel {
    /// 用业务模型覆盖除主键和创建时间外的所有列
    pub fn assign_from(&mut self, student: &crate::models::students::entities::Student) {
        use sea_orm::Set;

        self.first_name = Set(student.first_name.clone());
        self.last_name = Set(student.last_name.clone());
        self.gender = Set(student.gender.to_string());
        self.class_type = Set(student.class_type.to_string());
        self.khmer_score = Set(student.khmer_score);
        self.math_score = Set(student.math_score);
        self.history_score = Set(student.history_score);
        self.geography_score = Set(student.geography_score);
        self.ethics_score = Set(student.ethics_score);
        self.earth_science_score = Set(student.earth_science_score);
        self.chemistry_score = Set(student.chemistry_score);
        self.physics_score = Set(student.physics_score);
        self.biology_score = Set(student.biology_score);
        self.physical_education_score = Set(student.physical_education_score);
        self.foreign_language_score = Set(student.foreign_language_score);
        self.khmer_max = Set(student.khmer_max);
        self.math_max = Set(student.math_max);
        self.history_max = Set(student.history_max);
        self.geography_max = Set(student.geography_max);
        self.ethics_max = Set(student.ethics_max);
        self.earth_science_max = Set(student.earth_science_max);
        self.chemistry_max = Set(student.chemistry_max);
        self.physics_max = Set(student.physics_max);
        self.biology_max = Set(student.biology_max);
        self.physical_education_max = Set(student.physical_education_max);
        self.foreign_language_max = Set(student.foreign_language_max);
        self.total_score = Set(student.total_score);
        self.average_score = Set(student.average_score);
        self.grade = Set(student.grade.to_string());
        self.updated_at = Set(student.updated_at.timestamp());
    }
}
