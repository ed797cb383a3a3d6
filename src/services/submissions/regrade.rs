use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::models::ApiResponse;
use crate::services::access::{
    current_user, internal_error, load_submission, require_class_professor,
};

// 使用当前模板和当前作业描述重新评分
pub async fn regrade_submission(
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

    if let Err(resp) = require_class_professor(&storage, submission.class_id, user.id).await {
        return Ok(resp);
    }

    let grading = service.get_grading(request);
    match grading.grade_submission(&storage, &submission).await {
        Ok(updated) => {
            info!(
                "Submission {} regraded by {}: {}",
                submission_id, user.username, updated.grading_status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Submission regraded")))
        }
        Err(e) => Ok(internal_error("Failed to regrade submission", e)),
    }
}
