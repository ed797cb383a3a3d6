use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssignmentService;
use crate::models::assignments::entities::AssignmentDeletion;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    current_user, internal_error, load_assignment, require_class_professor,
};

pub async fn delete_assignment(
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

    match storage.delete_assignment(assignment_id).await {
        Ok(AssignmentDeletion::Deleted) => {
            info!("Assignment {} deleted by {}", assignment_id, user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Assignment deleted")))
        }
        Ok(AssignmentDeletion::NotFound) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::AssignmentNotFound, "Assignment not found"),
        )),
        Ok(AssignmentDeletion::HasSubmissions(count)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AssignmentHasSubmissions,
                format!(
                    "Cannot delete assignment: it has {count} submission(s). Submissions are never deleted."
                ),
            )))
        }
        Err(e) => Ok(internal_error("Failed to delete assignment", e)),
    }
}
