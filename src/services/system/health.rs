use std::time::Instant;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::Utc;
use tracing::warn;

use super::SystemService;
use crate::models::system::responses::{DatabaseHealthResponse, HealthResponse};
use crate::models::{ApiResponse, AppStartTime, ErrorCode};

pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let started = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|data| data.start_datetime)
        .unwrap_or_else(Utc::now);

    let response = HealthResponse {
        status: "ok".to_string(),
        system_name: config.app.system_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: config.app.environment.clone(),
        started_at: started.to_rfc3339(),
        uptime_seconds: (Utc::now() - started).num_seconds().max(0),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Service is running")))
}

pub async fn database_health(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(storage) = service.get_storage(request) else {
        return Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
            ErrorCode::DatabaseUnavailable,
            "Storage backend is not available",
        )));
    };

    let begin = Instant::now();
    match storage.ping().await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            DatabaseHealthResponse {
                status: "ok".to_string(),
                latency_ms: begin.elapsed().as_millis() as u64,
            },
            "Database is reachable",
        ))),
        Err(e) => {
            warn!("Database health check failed: {}", e);
            Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
                ErrorCode::DatabaseUnavailable,
                format!("Database is unreachable: {e}"),
            )))
        }
    }
}
