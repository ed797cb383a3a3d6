//! 服务层共用的身份与资源检查
//!
//! 以作业或提交为路径参数的接口无法使用 `RequireClassRole` 中间件，
//! 在这里先加载资源，再按所属课程检查身份。

use std::fmt::Display;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use tracing::error;

use crate::middlewares::RequireJWT;
use crate::models::assignments::entities::Assignment;
use crate::models::class_users::entities::ClassUser;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub(crate) fn internal_error(context: &str, e: impl Display) -> HttpResponse {
    error!("{context}: {e}");
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        context.to_string(),
    ))
}

pub(crate) fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::ClassPermissionDenied,
        message,
    ))
}

pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

pub(crate) async fn load_assignment(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
) -> Result<Assignment, HttpResponse> {
    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => Ok(assignment),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Err(internal_error("Failed to load assignment", e)),
    }
}

pub(crate) async fn load_submission(
    storage: &Arc<dyn Storage>,
    submission_id: i64,
) -> Result<Submission, HttpResponse> {
    match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => Ok(submission),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        ))),
        Err(e) => Err(internal_error("Failed to load submission", e)),
    }
}

/// 用户在课程中的身份，非成员为 None
pub(crate) async fn class_membership(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    user_id: i64,
) -> Result<Option<ClassUser>, HttpResponse> {
    storage
        .get_class_user(class_id, user_id)
        .await
        .map_err(|e| internal_error("Failed to check class membership", e))
}

/// 课程的授课教授
pub(crate) async fn require_class_professor(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    user_id: i64,
) -> Result<ClassUser, HttpResponse> {
    match class_membership(storage, class_id, user_id).await? {
        Some(cu) if cu.is_professor() => Ok(cu),
        _ => Err(forbidden("Only professors of this class can do this")),
    }
}

/// 课程的任意成员
pub(crate) async fn require_class_member(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    user_id: i64,
) -> Result<ClassUser, HttpResponse> {
    class_membership(storage, class_id, user_id)
        .await?
        .ok_or_else(|| forbidden("You are not a member of this class"))
}
