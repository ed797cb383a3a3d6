pub mod assignments;
pub mod auth;
pub mod class_users;
pub mod classes;
pub mod common;
pub mod prompts;
pub mod submissions;
pub mod users;

pub use common::{
    ApiResponse, FieldError, PaginatedResponse, PaginationInfo, PaginationQuery,
};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，随响应体中的 `code` 字段返回
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    ValidationFailed = 1006,
    RateLimitExceeded = 1029,

    // 认证与用户
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNotFound = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    UserNameAlreadyExists = 2006,
    UserEmailAlreadyExists = 2007,
    UserUpdateFailed = 2008,
    UserRoleInvalid = 2009,

    // 课程
    ClassNotFound = 3000,
    ClassAlreadyExists = 3001,
    ClassCreationFailed = 3002,
    ClassPermissionDenied = 3003,
    ClassAlreadyJoined = 3004,
    ClassJoinFailed = 3005,

    // 作业
    AssignmentNotFound = 4000,
    AssignmentHasSubmissions = 4001,

    // 提交与评分
    SubmissionNotFound = 5000,
    SubmissionCodeInvalid = 5001,
    FileTypeNotAllowed = 5002,
    FileNotFound = 5003,
    MultifileUploadNotAllowed = 5004,

    // 评分提示词
    PromptNotFound = 6000,
}
