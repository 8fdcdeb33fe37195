use std::sync::Arc;

use crate::errors::Result;
use crate::grading::GradeCalculator;
use crate::models::students::{
    entities::{ClassType, Student},
    requests::{StudentListQuery, UpdateStudentRequest},
    responses::StudentListResponse,
};

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 学生管理方法
    // 创建学生（派生字段由调用方计算）
    async fn create_student(&self, student: Student) -> Result<Student>;
    // 通过ID获取学生
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    // 分页列出学生
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    // 列出全部学生，按 ID 排序
    async fn list_all_students(&self, class_type: Option<ClassType>) -> Result<Vec<Student>>;
    // 部分更新并在同一事务内重新计算派生字段
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
        calculator: &GradeCalculator,
    ) -> Result<Option<Student>>;
    // 删除学生
    async fn delete_student(&self, id: i64) -> Result<bool>;
    // 清空学生表，返回删除条数
    async fn clear_students(&self) -> Result<u64>;

    /// 数据库连通性检查
    async fn ping(&self) -> Result<()>;
}

/// 根据配置创建存储后端
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
