use super::SeaOrmStorage;
use crate::entity::prelude::Students;
use crate::entity::students::{ActiveModel, Column};
use crate::errors::{Result, StudentSystemError};
use crate::grading::GradeCalculator;
use crate::models::{
    PaginationInfo,
    students::{
        entities::{ClassType, Student},
        requests::{SortOrder, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

/// 允许排序的列
fn sort_column(name: &str) -> Option<Column> {
    let column = match name {
        "id" => Column::Id,
        "first_name" => Column::FirstName,
        "last_name" => Column::LastName,
        "gender" => Column::Gender,
        "class_type" => Column::ClassType,
        "khmer_score" => Column::KhmerScore,
        "math_score" => Column::MathScore,
        "history_score" => Column::HistoryScore,
        "geography_score" => Column::GeographyScore,
        "ethics_score" => Column::EthicsScore,
        "earth_science_score" => Column::EarthScienceScore,
        "chemistry_score" => Column::ChemistryScore,
        "physics_score" => Column::PhysicsScore,
        "biology_score" => Column::BiologyScore,
        "physical_education_score" => Column::PhysicalEducationScore,
        "foreign_language_score" => Column::ForeignLanguageScore,
        "total_score" => Column::TotalScore,
        "average_score" => Column::AverageScore,
        "grade" => Column::Grade,
        "created_at" => Column::CreatedAt,
        "updated_at" => Column::UpdatedAt,
        _ => return None,
    };
    Some(column)
}

/// 姓名模糊搜索（不区分大小写），包含空格时额外按「名 姓」匹配
fn name_search_condition(term: &str) -> Condition {
    use sea_orm::sea_query::{Expr, ExprTrait, Func};

    let contains = |column: Column, needle: &str| {
        Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", needle.to_lowercase()))
    };

    let mut condition = Condition::any()
        .add(contains(Column::FirstName, term))
        .add(contains(Column::LastName, term));

    if let Some((first, last)) = term.split_once(char::is_whitespace) {
        let (first, last) = (first.trim(), last.trim());
        if !first.is_empty() && !last.is_empty() {
            condition = condition.add(
                Condition::all()
                    .add(contains(Column::FirstName, first))
                    .add(contains(Column::LastName, last)),
            );
        }
    }

    condition
}

impl SeaOrmStorage {
    /// 创建学生
    pub async fn create_student_impl(&self, student: Student) -> Result<Student> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| StudentSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model = ActiveModel {
            created_at: Set(student.created_at.timestamp()),
            ..Default::default()
        };
        model.assign_from(&student);

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| StudentSystemError::database_operation(format!("创建学生失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| StudentSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_student())
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| StudentSystemError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let page = query.page.max(1);
        let size = query.page_size.clamp(1, 100);

        let mut select = Students::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(name_search_condition(search.trim()));
        }

        // 等级筛选
        if let Some(grade) = query.grade {
            select = select.filter(Column::Grade.eq(grade.to_string()));
        }

        // 学科方向筛选
        if let Some(class_type) = query.class_type {
            select = select.filter(Column::ClassType.eq(class_type.to_string()));
        }

        // 排序，未知列回退到 ID 升序
        select = match query.sort_by.as_deref().and_then(sort_column) {
            Some(column) => match query.sort_order {
                SortOrder::Asc => select.order_by_asc(column),
                SortOrder::Desc => select.order_by_desc(column),
            },
            None => select.order_by_asc(Column::Id),
        };

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            StudentSystemError::database_operation(format!("查询学生总数失败: {e}"))
        })?;

        let pages = paginator.num_pages().await.map_err(|e| {
            StudentSystemError::database_operation(format!("查询学生页数失败: {e}"))
        })?;

        // 超出末页直接返回空页，避免偏移量 (page - 1) * size 溢出
        let students = if page > pages {
            Vec::new()
        } else {
            paginator.fetch_page(page - 1).await.map_err(|e| {
                StudentSystemError::database_operation(format!("查询学生列表失败: {e}"))
            })?
        };

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo {
                page: i64::try_from(page).unwrap_or(i64::MAX),
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 列出全部学生
    pub async fn list_all_students_impl(
        &self,
        class_type: Option<ClassType>,
    ) -> Result<Vec<Student>> {
        let mut select = Students::find();
        if let Some(class_type) = class_type {
            select = select.filter(Column::ClassType.eq(class_type.to_string()));
        }

        let students = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| StudentSystemError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    /// 更新学生信息
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
        calculator: &GradeCalculator,
    ) -> Result<Option<Student>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| StudentSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Students::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| StudentSystemError::database_operation(format!("查询学生失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut student = existing.clone().into_student();
        update.apply_to(&mut student);
        calculator.apply(&mut student);

        if calculator.policy().enforce_track_maxima {
            let mismatches = calculator.check_track_maxima(&student);
            if !mismatches.is_empty() {
                txn.rollback().await.map_err(|e| {
                    StudentSystemError::database_operation(format!("回滚事务失败: {e}"))
                })?;
                let details: Vec<String> = mismatches.iter().map(|m| m.to_string()).collect();
                return Err(StudentSystemError::validation(details.join("; ")));
            }
        }

        student.updated_at = chrono::Utc::now();

        let mut model: ActiveModel = existing.into();
        model.assign_from(&student);

        let result = model
            .update(&txn)
            .await
            .map_err(|e| StudentSystemError::database_operation(format!("更新学生失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| StudentSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(result.into_student()))
    }

    /// 删除学生
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| StudentSystemError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 清空学生表
    pub async fn clear_students_impl(&self) -> Result<u64> {
        let result = Students::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| StudentSystemError::database_operation(format!("清空学生表失败: {e}")))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::GradingPolicy;
    use crate::models::students::entities::{Gender, Grade, Subject};

    async fn storage() -> SeaOrmStorage {
        let mut opt = sea_orm::ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).sqlx_logging(false);
        let db = sea_orm::Database::connect(opt).await.unwrap();
        SeaOrmStorage::with_connection(db).await.unwrap()
    }

    fn student(first: &str, last: &str, class_type: ClassType, ratio: f64) -> Student {
        let mut s = Student::new(first, last, Gender::Female, class_type);
        for &(subject, max) in class_type.subject_table() {
            s.set_score(subject, max * ratio);
        }
        GradeCalculator::default().apply(&mut s);
        s
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let storage = storage().await;
        let created = storage
            .create_student_impl(student("Sokha", "Chey", ClassType::Science, 0.8))
            .await
            .unwrap();
        assert!(created.id > 0);
        assert_eq!(created.grade, Grade::B);
        assert_eq!(created.math_max, 125.0);

        let fetched = storage.get_student_by_id_impl(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
        assert!(storage.get_student_by_id_impl(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_search_and_sort() {
        let storage = storage().await;
        for (first, last, class_type, ratio) in [
            ("Sokha", "Chey", ClassType::SocialScience, 0.95),
            ("Dara", "Lim", ClassType::Science, 0.55),
            ("Sophea", "Kim", ClassType::SocialScience, 0.3),
        ] {
            storage
                .create_student_impl(student(first, last, class_type, ratio))
                .await
                .unwrap();
        }

        let page = storage
            .list_students_with_pagination_impl(StudentListQuery {
                search: Some("SOKHA".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].last_name, "Chey");

        let page = storage
            .list_students_with_pagination_impl(StudentListQuery {
                search: Some("dara lim".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);

        let page = storage
            .list_students_with_pagination_impl(StudentListQuery {
                class_type: Some(ClassType::SocialScience),
                sort_by: Some("average_score".to_string()),
                sort_order: SortOrder::Desc,
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|s| s.first_name.as_str()).collect();
        assert_eq!(names, vec!["Sokha", "Sophea"]);

        let page = storage
            .list_students_with_pagination_impl(StudentListQuery {
                grade: Some(Grade::F),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].first_name, "Sophea");

        // 未知排序列回退到 ID 升序
        let page = storage
            .list_students_with_pagination_impl(StudentListQuery {
                page_size: 2,
                sort_by: Some("password".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.items[0].id < page.items[1].id);
    }

    #[tokio::test]
    async fn test_page_beyond_last_returns_empty() {
        let storage = storage().await;
        for first in ["Sokha", "Dara", "Sophea"] {
            storage
                .create_student_impl(student(first, "Chey", ClassType::Science, 0.6))
                .await
                .unwrap();
        }

        for page in [3, i64::MAX as u64, u64::MAX] {
            let result = storage
                .list_students_with_pagination_impl(StudentListQuery {
                    page,
                    page_size: 100,
                    ..Default::default()
                })
                .await
                .unwrap();
            assert!(result.items.is_empty());
            assert_eq!(result.pagination.total, 3);
            assert_eq!(result.pagination.total_pages, 1);
        }

        let last = storage
            .list_students_with_pagination_impl(StudentListQuery {
                page: 2,
                page_size: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.pagination.page, 2);
    }

    #[tokio::test]
    async fn test_update_recomputes_in_transaction() {
        let storage = storage().await;
        let calc = GradeCalculator::default();
        let created = storage
            .create_student_impl(student("Sokha", "Chey", ClassType::SocialScience, 0.3))
            .await
            .unwrap();
        assert_eq!(created.grade, Grade::F);

        let update = UpdateStudentRequest {
            khmer_score: Some(125.0),
            math_score: Some(75.0),
            history_score: Some(75.0),
            geography_score: Some(75.0),
            ..Default::default()
        };
        let updated = storage
            .update_student_impl(created.id, update, &calc)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.score_of(Subject::Ethics), Some(22.5));
        assert_eq!(updated.total_score, calc.total_score(&updated));
        assert_eq!(updated.grade, calc.grade(&updated));
        assert_eq!(updated.created_at, created.created_at);

        let missing = storage
            .update_student_impl(9999, UpdateStudentRequest::default(), &calc)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_track_mismatch_when_enforced() {
        let storage = storage().await;
        let calc = GradeCalculator::new(GradingPolicy {
            enforce_track_maxima: true,
            ..GradingPolicy::default()
        });
        let created = storage
            .create_student_impl(student("Dara", "Lim", ClassType::SocialScience, 0.7))
            .await
            .unwrap();

        // 切换方向后满分仍是文科标准值
        let update = UpdateStudentRequest {
            class_type: Some(ClassType::Science),
            ..Default::default()
        };
        let err = storage
            .update_student_impl(created.id, update, &calc)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E006");

        let unchanged = storage
            .get_student_by_id_impl(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.class_type, ClassType::SocialScience);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let storage = storage().await;
        let a = storage
            .create_student_impl(student("Sokha", "Chey", ClassType::Science, 0.5))
            .await
            .unwrap();
        storage
            .create_student_impl(student("Dara", "Lim", ClassType::Science, 0.5))
            .await
            .unwrap();

        assert!(storage.delete_student_impl(a.id).await.unwrap());
        assert!(!storage.delete_student_impl(a.id).await.unwrap());

        let science = storage
            .list_all_students_impl(Some(ClassType::Science))
            .await
            .unwrap();
        assert_eq!(science.len(), 1);

        assert_eq!(storage.clear_students_impl().await.unwrap(), 1);
        assert!(storage.list_all_students_impl(None).await.unwrap().is_empty());
    }
}
