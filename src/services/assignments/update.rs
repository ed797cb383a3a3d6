use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssignmentService;
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode, FieldError};
use crate::services::access::{
    current_user, internal_error, load_assignment, require_class_professor,
};
use crate::utils::validate::validate_name;

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    update: UpdateAssignmentRequest,
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

    // 权限检查在任何写入之前
    if let Err(resp) = require_class_professor(&storage, assignment.class_id, user.id).await {
        info!(
            "User {} denied editing assignment {} of class {}",
            user.username, assignment_id, assignment.class_id
        );
        return Ok(resp);
    }

    if let Some(name) = &update.name
        && let Err(msg) = validate_name(name, 200)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::validation_failed(vec![FieldError::new("name", msg)])));
    }

    let update = UpdateAssignmentRequest {
        name: update.name.map(|n| n.trim().to_string()),
        description: update.description,
    };

    match storage.update_assignment(assignment_id, update).await {
        Ok(Some(assignment)) => {
            info!("Assignment {} updated by {}", assignment_id, user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                assignment,
                "Assignment updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(internal_error("Failed to update assignment", e)),
    }
}
