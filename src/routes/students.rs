use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, guard, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::students::requests::{
    CreateStudentRequest, StatsQuery, StudentListParams, UpdateStudentRequest,
};
use crate::services::StudentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

// HTTP处理程序
pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(query.into_inner(), &req).await
}

pub async fn list_all_students(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_all_students(&req).await
}

pub async fn create_student(
    req: HttpRequest,
    student_data: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_student(student_data.into_inner(), &req)
        .await
}

pub async fn get_student(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(student_id.0, &req).await
}

pub async fn update_student(
    req: HttpRequest,
    student_id: SafeIDI64,
    update_data: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(student_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_student(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(student_id.0, &req).await
}

pub async fn get_overview_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_overview_stats(&req).await
}

pub async fn get_detailed_stats(
    req: HttpRequest,
    query: web::Query<StatsQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .get_detailed_stats(query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(RateLimit::api())
            // 写操作额外限流
            .service(
                web::scope("")
                    .guard(guard::Any(guard::Post()).or(guard::Put()).or(guard::Delete()))
                    .wrap(RateLimit::writes())
                    .route("", web::post().to(create_student))
                    .route("/{id}", web::put().to(update_student))
                    .route("/{id}", web::delete().to(delete_student)),
            )
            // 固定路径需在 /{id} 之前注册
            .route("", web::get().to(list_students))
            .route("/all", web::get().to(list_all_students))
            .route("/stats/overview", web::get().to(get_overview_stats))
            .route("/stats/detailed", web::get().to(get_detailed_stats))
            .route("/{id}", web::get().to(get_student)),
    );
}
