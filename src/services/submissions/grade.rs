use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::models::submissions::requests::ProfessorGradeRequest;
use crate::models::submissions::responses::ProfessorGradeResponse;
use crate::models::{ApiResponse, ErrorCode, FieldError};
use crate::services::access::{
    current_user, internal_error, load_submission, require_class_professor,
};
use crate::utils::validate::validate_grade;

pub async fn professor_grade(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    grade: ProfessorGradeRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = validate_grade(grade.grade) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::validation_failed(vec![FieldError::new("grade", msg)])));
    }

    let submission = match load_submission(&storage, submission_id).await {
        Ok(submission) => submission,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = require_class_professor(&storage, submission.class_id, user.id).await {
        return Ok(resp);
    }

    let feedback = grade
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());

    match storage
        .set_professor_grade(submission_id, grade.grade, feedback)
        .await
    {
        Ok(Some(updated)) => {
            info!(
                "Submission {} graded {} by professor {}",
                submission_id, grade.grade, user.username
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ProfessorGradeResponse {
                    submission_id: updated.id,
                    professor_grade: updated.professor_grade,
                    professor_feedback: updated.professor_feedback,
                    final_grade: updated.final_grade,
                },
                "Grade saved",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        ))),
        Err(e) => Ok(internal_error("Failed to save grade", e)),
    }
}
