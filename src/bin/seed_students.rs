//! 清空学生表并写入一批成绩分布接近真实考试的示例数据
//!
//! 运行：`cargo run --bin seed_students`

use dotenv::dotenv;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::{error, info};

use student_records::config::AppConfig;
use student_records::grading::{GradeCalculator, round2};
use student_records::models::students::entities::{ClassType, Gender, Student, Subject};
use student_records::storage::{self, Storage};

const STUDENTS_PER_TRACK: usize = 20;

const MALE_FIRST_NAMES: &[&str] = &[
    "សុខា", "សុផល", "សុខុម", "វិទូ", "ចន្ថា", "រតនៈ", "ពិសិដ្ឋ", "សុវណ្ណ", "វិរៈ", "មុនី",
    "ប្រាក់", "ប៊ុន", "ចាន់", "សាន",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "រតនា", "សុភា", "វិចិត្រា", "សុខណា", "ពេជ្រ", "រស្មី", "លីដា", "មាលា", "រ៉ាណា", "ស្រីពៅ",
    "ដារ៉ា", "សុខដា", "ច័ន្ទ", "ផុន",
];

const LAST_NAMES: &[&str] = &[
    "ជ័យ", "ម៉ម", "សុខ", "សុផល", "វិចិត្រ", "ចន្ថា", "មុនី", "គឹម", "ស៊ុន", "លី", "យិម", "ហុក",
    "ផាន់", "ឃុន", "ចាន់", "សាន",
];

/// 成绩水平
#[derive(Debug, Clone, Copy)]
enum Level {
    Excellent,
    Good,
    Average,
    BelowAverage,
    Poor,
}

impl Level {
    /// 每个方向 20 人的水平分布：1 / 5 / 7 / 4 / 3
    fn distribution() -> Vec<Level> {
        [
            (Level::Excellent, 1),
            (Level::Good, 5),
            (Level::Average, 7),
            (Level::BelowAverage, 4),
            (Level::Poor, 3),
        ]
        .into_iter()
        .flat_map(|(level, count)| std::iter::repeat_n(level, count))
        .collect()
    }

    /// 得分率区间
    fn percentage_range(self) -> (f64, f64) {
        match self {
            Level::Excellent => (0.85, 0.95),
            Level::Good => (0.70, 0.84),
            Level::Average => (0.55, 0.69),
            Level::BelowAverage => (0.40, 0.54),
            Level::Poor => (0.20, 0.39),
        }
    }

    /// 外语成绩区间（满分 50）
    fn foreign_language_range(self) -> (f64, f64) {
        match self {
            Level::Excellent => (38.0, 48.0),
            Level::Good => (28.0, 37.0),
            Level::Average => (20.0, 27.0),
            Level::BelowAverage | Level::Poor => (10.0, 19.0),
        }
    }
}

fn subject_score<R: Rng>(rng: &mut R, max: f64, level: Level) -> f64 {
    let (low, high) = level.percentage_range();
    let percentage = rng.random_range(low..=high) + rng.random_range(-0.03..=0.03);
    round2(max * percentage.clamp(0.0, 1.0))
}

fn foreign_language_score<R: Rng>(rng: &mut R, level: Level) -> f64 {
    // 约 30% 的学生不选外语
    if rng.random_bool(0.3) {
        return 0.0;
    }
    let (low, high) = level.foreign_language_range();
    round2(rng.random_range(low..=high))
}

fn random_student<R: Rng>(
    rng: &mut R,
    class_type: ClassType,
    level: Level,
    calculator: &GradeCalculator,
) -> Student {
    let gender = if rng.random_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    };
    let first_names = match gender {
        Gender::Male => MALE_FIRST_NAMES,
        Gender::Female => FEMALE_FIRST_NAMES,
    };
    let first_name = first_names.choose(rng).copied().unwrap_or("សុខា");
    let last_name = LAST_NAMES.choose(rng).copied().unwrap_or("សុខ");

    let mut student = Student::new(first_name, last_name, gender, class_type);
    for &(subject, max) in class_type.subject_table() {
        let score = subject_score(rng, max, level);
        student.set_score(subject, score);
    }
    let fl_score = foreign_language_score(rng, level);
    student.set_score(Subject::ForeignLanguage, fl_score);

    calculator.apply(&mut student);
    student
}

async fn seed_track(
    storage: &dyn Storage,
    class_type: ClassType,
    calculator: &GradeCalculator,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut levels = Level::distribution();
    // rng 不跨 await 持有
    let students: Vec<Student> = {
        let mut rng = rand::rng();
        levels.shuffle(&mut rng);
        levels
            .iter()
            .take(STUDENTS_PER_TRACK)
            .map(|&level| random_student(&mut rng, class_type, level, calculator))
            .collect()
    };

    for student in students {
        let created = storage.create_student(student).await?;
        info!(
            "[{}] {} | total {:.2} | average {:.2}% | grade {}",
            class_type,
            created.full_name(),
            created.total_score,
            created.average_score,
            created.grade
        );
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    AppConfig::init()?;
    let calculator = GradeCalculator::new(AppConfig::get().grading.clone());

    let storage = storage::create_storage().await?;

    let removed = storage.clear_students().await?;
    info!("Cleared {} existing students", removed);

    for class_type in [ClassType::SocialScience, ClassType::Science] {
        info!("Creating {} students...", class_type);
        seed_track(storage.as_ref(), class_type, &calculator).await?;
    }

    let students = storage.list_all_students(None).await?;
    info!("Seed completed, {} students in database", students.len());
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .init();

    if let Err(e) = run().await {
        error!("Seeding failed: {}", e);
        std::process::exit(1);
    }
}
