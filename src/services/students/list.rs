use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, storage_unavailable};
use crate::models::students::requests::StudentListParams;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_students(
    service: &StudentService,
    query: StudentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(storage) = service.get_storage(request) else {
        return Ok(storage_unavailable());
    };

    match storage
        .list_students_with_pagination(query.into_query())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Student list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve student list: {e}"),
            )),
        ),
    }
}

/// 不分页，按 ID 升序返回全部学生
pub async fn list_all_students(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(storage) = service.get_storage(request) else {
        return Ok(storage_unavailable());
    };

    match storage.list_all_students(None).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            students,
            "All students retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve students: {e}"),
            )),
        ),
    }
}
