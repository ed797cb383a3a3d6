use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::services::access::{
    current_user, internal_error, load_assignment, require_class_professor,
};

pub async fn list_assignment_submissions(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let assignment = match load_assignment(&storage, assignment_id).await {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = require_class_professor(&storage, assignment.class_id, user.id).await {
        return Ok(resp);
    }

    match storage
        .list_assignment_submissions_by_student(assignment_id)
        .await
    {
        Ok(groups) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            groups,
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list assignment submissions", e)),
    }
}
