use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 性别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// 统计结果中使用的键名
    pub fn stats_key(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "M"),
            Gender::Female => write!(f, "F"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            _ => Err(format!("Invalid gender: {s}")),
        }
    }
}

// 科目
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum Subject {
    Khmer,
    Math,
    History,
    Geography,
    Ethics,
    EarthScience,
    Chemistry,
    Physics,
    Biology,
    PhysicalEducation,
    ForeignLanguage, // 加分科目
}

impl Subject {
    pub fn name(&self) -> &'static str {
        match self {
            Subject::Khmer => "khmer",
            Subject::Math => "math",
            Subject::History => "history",
            Subject::Geography => "geography",
            Subject::Ethics => "ethics",
            Subject::EarthScience => "earth_science",
            Subject::Chemistry => "chemistry",
            Subject::Physics => "physics",
            Subject::Biology => "biology",
            Subject::PhysicalEducation => "physical_education",
            Subject::ForeignLanguage => "foreign_language",
        }
    }

    /// 客户端未提供满分时使用的表结构默认值
    pub fn schema_default_max(&self) -> Option<f64> {
        match self {
            Subject::Khmer | Subject::History => None,
            Subject::Math => Some(75.0),
            Subject::Geography | Subject::Ethics => Some(75.0),
            Subject::EarthScience => Some(50.0),
            Subject::Chemistry | Subject::Physics | Subject::Biology => Some(75.0),
            Subject::PhysicalEducation => Some(75.0),
            Subject::ForeignLanguage => Some(50.0),
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// 学科方向（文科 / 理科）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum ClassType {
    #[default]
    SocialScience,
    Science,
}

const SOCIAL_SCIENCE_SUBJECTS: [(Subject, f64); 6] = [
    (Subject::Khmer, 125.0),
    (Subject::Math, 75.0),
    (Subject::History, 75.0),
    (Subject::Geography, 75.0),
    (Subject::Ethics, 75.0),
    (Subject::EarthScience, 50.0),
];

const SCIENCE_SUBJECTS: [(Subject, f64); 6] = [
    (Subject::Math, 125.0),
    (Subject::Chemistry, 75.0),
    (Subject::Physics, 75.0),
    (Subject::Biology, 75.0),
    (Subject::Khmer, 75.0),
    (Subject::History, 50.0),
];

impl ClassType {
    pub const SOCIAL_SCIENCE: &'static str = "social_science";
    pub const SCIENCE: &'static str = "science";

    /// 计入总分的科目及其标准满分（不含外语）
    pub fn subject_table(&self) -> &'static [(Subject, f64)] {
        match self {
            ClassType::SocialScience => &SOCIAL_SCIENCE_SUBJECTS,
            ClassType::Science => &SCIENCE_SUBJECTS,
        }
    }

    pub fn active_subjects(&self) -> impl Iterator<Item = Subject> + '_ {
        self.subject_table().iter().map(|(subject, _)| *subject)
    }

    pub fn is_active(&self, subject: Subject) -> bool {
        self.active_subjects().any(|s| s == subject)
    }

    /// 科目在该方向下的默认满分
    pub fn default_max(&self, subject: Subject) -> f64 {
        self.subject_table()
            .iter()
            .find(|(s, _)| *s == subject)
            .map(|(_, max)| *max)
            .or_else(|| subject.schema_default_max())
            .unwrap_or(75.0)
    }
}

impl std::fmt::Display for ClassType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassType::SocialScience => write!(f, "{}", ClassType::SOCIAL_SCIENCE),
            ClassType::Science => write!(f, "{}", ClassType::SCIENCE),
        }
    }
}

impl std::str::FromStr for ClassType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ClassType::SOCIAL_SCIENCE => Ok(ClassType::SocialScience),
            ClassType::SCIENCE => Ok(ClassType::Science),
            _ => Err(format!("Invalid class type: {s}")),
        }
    }
}

// 等级
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    #[default]
    F,
}

impl Grade {
    pub const ALL: [Grade; 6] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E, Grade::F];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "E" => Ok(Grade::E),
            "F" => Ok(Grade::F),
            _ => Err(format!("Invalid grade: {s}")),
        }
    }
}

// 学生实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub class_type: ClassType,

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

    // 派生字段，仅由 GradeCalculator::apply 写入
    pub total_score: f64,
    pub average_score: f64,
    pub grade: Grade,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// 创建一个尚未入库的空白记录，满分取方向默认值
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        gender: Gender,
        class_type: ClassType,
    ) -> Self {
        let now = Utc::now();
        let max = |subject: Subject| class_type.default_max(subject);
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender,
            class_type,
            khmer_score: None,
            math_score: 0.0,
            history_score: None,
            geography_score: None,
            ethics_score: None,
            earth_science_score: 0.0,
            chemistry_score: None,
            physics_score: None,
            biology_score: None,
            physical_education_score: None,
            foreign_language_score: 0.0,
            khmer_max: Some(max(Subject::Khmer)),
            math_max: max(Subject::Math),
            history_max: Some(max(Subject::History)),
            geography_max: Some(max(Subject::Geography)),
            ethics_max: Some(max(Subject::Ethics)),
            earth_science_max: max(Subject::EarthScience),
            chemistry_max: Some(max(Subject::Chemistry)),
            physics_max: Some(max(Subject::Physics)),
            biology_max: Some(max(Subject::Biology)),
            physical_education_max: Some(max(Subject::PhysicalEducation)),
            foreign_language_max: max(Subject::ForeignLanguage),
            total_score: 0.0,
            average_score: 0.0,
            grade: Grade::F,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn score_of(&self, subject: Subject) -> Option<f64> {
        match subject {
            Subject::Khmer => self.khmer_score,
            Subject::Math => Some(self.math_score),
            Subject::History => self.history_score,
            Subject::Geography => self.geography_score,
            Subject::Ethics => self.ethics_score,
            Subject::EarthScience => Some(self.earth_science_score),
            Subject::Chemistry => self.chemistry_score,
            Subject::Physics => self.physics_score,
            Subject::Biology => self.biology_score,
            Subject::PhysicalEducation => self.physical_education_score,
            Subject::ForeignLanguage => Some(self.foreign_language_score),
        }
    }

    pub fn max_of(&self, subject: Subject) -> Option<f64> {
        match subject {
            Subject::Khmer => self.khmer_max,
            Subject::Math => Some(self.math_max),
            Subject::History => self.history_max,
            Subject::Geography => self.geography_max,
            Subject::Ethics => self.ethics_max,
            Subject::EarthScience => Some(self.earth_science_max),
            Subject::Chemistry => self.chemistry_max,
            Subject::Physics => self.physics_max,
            Subject::Biology => self.biology_max,
            Subject::PhysicalEducation => self.physical_education_max,
            Subject::ForeignLanguage => Some(self.foreign_language_max),
        }
    }

    pub fn set_score(&mut self, subject: Subject, score: f64) {
        match subject {
            Subject::Khmer => self.khmer_score = Some(score),
            Subject::Math => self.math_score = score,
            Subject::History => self.history_score = Some(score),
            Subject::Geography => self.geography_score = Some(score),
            Subject::Ethics => self.ethics_score = Some(score),
            Subject::EarthScience => self.earth_science_score = score,
            Subject::Chemistry => self.chemistry_score = Some(score),
            Subject::Physics => self.physics_score = Some(score),
            Subject::Biology => self.biology_score = Some(score),
            Subject::PhysicalEducation => self.physical_education_score = Some(score),
            Subject::ForeignLanguage => self.foreign_language_score = score,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
