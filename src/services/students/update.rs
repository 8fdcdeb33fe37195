use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{StudentService, stats::invalidate_stats_cache, storage_unavailable};
use crate::errors::StudentSystemError;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::UpdateStudentRequest, responses::StudentResponse},
};

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    update_data: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = update_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let Some(storage) = service.get_storage(request) else {
        return Ok(storage_unavailable());
    };
    let calculator = service.get_calculator(request);

    match storage
        .update_student(student_id, update_data, &calculator)
        .await
    {
        Ok(Some(student)) => {
            invalidate_stats_cache(
                service.get_cache(request).as_deref(),
                service.get_stats_generation(request).as_deref(),
            )
            .await;
            info!(
                "Student {} updated: average {:.2}, grade {}",
                student.id, student.average_score, student.grade
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentResponse { student },
                "Student updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        // 启用满分校验时的方向满分不一致
        Err(StudentSystemError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg))),
        Err(e) => {
            let msg = format!("Student update failed: {e}");
            error!("{}", msg);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::StudentUpdateFailed, msg)))
        }
    }
}
