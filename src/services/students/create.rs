use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{StudentService, stats::invalidate_stats_cache, storage_unavailable};
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::CreateStudentRequest, responses::StudentResponse},
};

pub async fn create_student(
    service: &StudentService,
    student_data: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = student_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let calculator = service.get_calculator(request);
    let mut student = student_data.into_student();
    calculator.apply(&mut student);

    if calculator.policy().enforce_track_maxima {
        let mismatches = calculator.check_track_maxima(&student);
        if !mismatches.is_empty() {
            let details: Vec<String> = mismatches.iter().map(ToString::to_string).collect();
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                details.join("; "),
            )));
        }
    }

    let Some(storage) = service.get_storage(request) else {
        return Ok(storage_unavailable());
    };

    match storage.create_student(student).await {
        Ok(student) => {
            invalidate_stats_cache(
                service.get_cache(request).as_deref(),
                service.get_stats_generation(request).as_deref(),
            )
            .await;
            info!(
                "Student {} created: {} ({})",
                student.id,
                student.full_name(),
                student.class_type
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StudentResponse { student },
                "Student created successfully",
            )))
        }
        Err(e) => {
            let msg = format!("Student creation failed: {e}");
            error!("{}", msg);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::StudentCreationFailed, msg)))
        }
    }
}
