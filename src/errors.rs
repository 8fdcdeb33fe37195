//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_student_system_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum StudentSystemError {
            $($variant(String),)*
        }

        impl StudentSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(StudentSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(StudentSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(StudentSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl StudentSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        StudentSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_student_system_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E006", "Validation Error"),
    Serialization("E007", "Serialization Error"),
}

impl StudentSystemError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for StudentSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for StudentSystemError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for StudentSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        StudentSystemError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for StudentSystemError {
    fn from(err: serde_json::Error) -> Self {
        StudentSystemError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudentSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(StudentSystemError::cache_connection("test").code(), "E001");
        assert_eq!(StudentSystemError::database_config("test").code(), "E003");
        assert_eq!(
            StudentSystemError::database_operation("test").code(),
            "E005"
        );
        assert_eq!(StudentSystemError::validation("test").code(), "E006");
        assert_eq!(StudentSystemError::serialization("test").code(), "E007");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            StudentSystemError::cache_plugin_not_found("redis").error_type(),
            "Cache Plugin Not Found"
        );
        assert_eq!(
            StudentSystemError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = StudentSystemError::validation("math_score must not be negative");
        assert_eq!(err.message(), "math_score must not be negative");
        assert_eq!(
            err.format_simple(),
            "Validation Error: math_score must not be negative"
        );
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: StudentSystemError = serde_json::from_str::<i64>("not-a-number")
            .unwrap_err()
            .into();
        assert!(matches!(err, StudentSystemError::Serialization(_)));
    }
}
