pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod stats;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::warn;

use crate::cache::ObjectCache;
use crate::grading::GradeCalculator;
use crate::models::students::requests::{
    CreateStudentRequest, StatsQuery, StudentListParams, UpdateStudentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub use stats::StatsGeneration;

pub struct StudentService;

impl StudentService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Option<Arc<dyn Storage>> {
        request
            .app_data::<web::Data<Arc<dyn Storage>>>()
            .map(|data| data.get_ref().clone())
    }

    pub(crate) fn get_calculator(&self, request: &HttpRequest) -> Arc<GradeCalculator> {
        match request.app_data::<web::Data<GradeCalculator>>() {
            Some(calculator) => calculator.clone().into_inner(),
            None => {
                warn!("GradeCalculator not found in app data, using default grading policy");
                Arc::new(GradeCalculator::default())
            }
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        request
            .app_data::<web::Data<Arc<dyn ObjectCache>>>()
            .map(|data| data.get_ref().clone())
    }

    pub(crate) fn get_stats_generation(
        &self,
        request: &HttpRequest,
    ) -> Option<Arc<StatsGeneration>> {
        request
            .app_data::<web::Data<StatsGeneration>>()
            .map(|data| data.clone().into_inner())
    }

    // 获取学生列表（分页）
    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, query, request).await
    }

    // 获取全部学生
    pub async fn list_all_students(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_all_students(self, request).await
    }

    // 创建学生
    pub async fn create_student(
        &self,
        student_data: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, student_data, request).await
    }

    // 根据ID获取学生
    pub async fn get_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, student_id, request).await
    }

    // 更新学生信息
    pub async fn update_student(
        &self,
        student_id: i64,
        update_data: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, student_id, update_data, request).await
    }

    // 删除学生
    pub async fn delete_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, student_id, request).await
    }

    // 总览统计
    pub async fn get_overview_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::get_overview_stats(self, request).await
    }

    // 详细统计
    pub async fn get_detailed_stats(
        &self,
        query: StatsQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        stats::get_detailed_stats(self, query, request).await
    }
}

/// 存储未注册时的响应
pub(crate) fn storage_unavailable() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
        ErrorCode::DatabaseUnavailable,
        "Storage backend is not available",
    ))
}
