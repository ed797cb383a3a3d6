use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::SubmissionService;
use crate::grading::MAX_CODE_LENGTH;
use crate::models::class_users::entities::ClassUserRole;
use crate::models::submissions::requests::{CreateSubmissionRequest, GradingUpdate};
use crate::models::{ApiResponse, ErrorCode, FieldError};
use crate::services::access::{class_membership, current_user, internal_error, load_assignment};
use crate::utils::validate::validate_submission_code;

pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    submit_code(service, request, submission.assignment_id, submission.code).await
}

/// 保存提交、调用 AI 评分并写回结果
///
/// AI 失败时提交仍然创建成功，状态为 failed。
pub(super) async fn submit_code(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    code: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = validate_submission_code(&code, MAX_CODE_LENGTH) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::validation_failed(vec![FieldError::new("code", msg)])));
    }

    let assignment = match load_assignment(&storage, assignment_id).await {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };

    // 必须是该课程的选课学生
    match class_membership(&storage, assignment.class_id, user.id).await {
        Ok(Some(cu)) if cu.role == ClassUserRole::Student => {}
        Ok(_) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "You are not enrolled in this class",
            )));
        }
        Err(resp) => return Ok(resp),
    }

    let submission = match storage
        .create_submission(user.id, assignment.class_id, assignment.id, &code)
        .await
    {
        Ok(submission) => submission,
        Err(e) => return Ok(internal_error("Failed to save submission", e)),
    };
    info!(
        "Submission {} created by {} for assignment {}",
        submission.id, user.username, assignment.id
    );

    let grading = service.get_grading(request);
    let submission = match grading.grade_submission(&storage, &submission).await {
        Ok(graded) => graded,
        Err(e) => {
            // 提交已保存，尽量标记为 failed
            error!("Failed to record grading for submission {}: {}", submission.id, e);
            let update = GradingUpdate::Failed {
                error: format!("Grading could not be recorded: {}", e.message()),
            };
            match storage.apply_grading_update(submission.id, update).await {
                Ok(Some(failed)) => failed,
                Ok(None) => submission,
                Err(e) => {
                    error!("Failed to flag submission {} for review: {}", submission.id, e);
                    submission
                }
            }
        }
    };

    Ok(HttpResponse::Created().json(ApiResponse::success(
        submission,
        "Submission created successfully",
    )))
}
