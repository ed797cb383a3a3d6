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
macro_rules! define_grader_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum GraderError {
            $($variant(String),)*
        }

        impl GraderError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(GraderError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GraderError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(GraderError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl GraderError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GraderError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_grader_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Conflict("E006", "Resource Conflict"),
    Serialization("E007", "Serialization Error"),
}

impl GraderError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GraderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GraderError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GraderError {
    fn from(err: sea_orm::DbErr) -> Self {
        GraderError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GraderError {
    fn from(err: serde_json::Error) -> Self {
        GraderError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GraderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GraderError::database_config("test").code(), "E001");
        assert_eq!(GraderError::database_operation("test").code(), "E003");
        assert_eq!(GraderError::validation("test").code(), "E004");
        assert_eq!(GraderError::not_found("test").code(), "E005");
        assert_eq!(GraderError::conflict("test").code(), "E006");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            GraderError::conflict("test").error_type(),
            "Resource Conflict"
        );
        assert_eq!(
            GraderError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = GraderError::conflict("作业下仍有 2 份提交");
        assert_eq!(err.message(), "作业下仍有 2 份提交");
    }

    #[test]
    fn test_format_simple() {
        let err = GraderError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[test]
    fn test_from_serde_error() {
        let err: GraderError = serde_json::from_str::<i32>("not json").unwrap_err().into();
        assert_eq!(err.code(), "E007");
    }
}
