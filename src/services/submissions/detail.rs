use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::ApiResponse;
use crate::models::submissions::responses::SubmissionDetailResponse;
use crate::services::access::{
    current_user, internal_error, load_submission, require_class_professor,
};

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let submission = match load_submission(&storage, submission_id).await {
        Ok(submission) => submission,
        Err(resp) => return Ok(resp),
    };

    // 提交者本人或课程教授
    if submission.student_id != user.id
        && let Err(resp) = require_class_professor(&storage, submission.class_id, user.id).await
    {
        return Ok(resp);
    }

    let assignment = match storage.get_assignment_by_id(submission.assignment_id).await {
        Ok(assignment) => assignment,
        Err(e) => return Ok(internal_error("Failed to load assignment", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionDetailResponse {
            submission,
            assignment,
        },
        "Submission retrieved successfully",
    )))
}
