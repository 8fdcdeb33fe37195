use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 路径参数 `{id}`，必须是正整数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("id").unwrap_or_default();
        let result = match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(SafeIDI64(id)),
            _ => Err(bad_request(format!("Invalid id: '{raw}'"))),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    async fn extract(id: &str) -> Result<SafeIDI64, actix_web::Error> {
        let req = TestRequest::default().param("id", id.to_string()).to_http_request();
        SafeIDI64::from_request(&req, &mut Payload::None).await
    }

    #[actix_web::test]
    async fn test_valid_id() {
        assert_eq!(extract("42").await.unwrap(), SafeIDI64(42));
    }

    #[actix_web::test]
    async fn test_invalid_ids_rejected() {
        for raw in ["0", "-3", "abc", "1.5", ""] {
            let err = extract(raw).await.unwrap_err();
            assert_eq!(
                err.as_response_error().status_code(),
                actix_web::http::StatusCode::BAD_REQUEST
            );
        }
    }
}
