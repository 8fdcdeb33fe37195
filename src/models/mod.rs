pub mod common;
pub mod students;
pub mod system;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    RateLimitExceeded = 1029,

    // 学生相关
    StudentNotFound = 2001,
    StudentCreationFailed = 2002,
    StudentUpdateFailed = 2003,
    StudentDeleteFailed = 2004,

    // 服务端错误
    InternalServerError = 5000,
    DatabaseUnavailable = 5001,
}
