use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssignmentService;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::{ApiResponse, FieldError};
use crate::services::access::{current_user, internal_error};
use crate::utils::validate::validate_name;

// 由 RequireClassRole::new(Professor) 保护
pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    class_id: i64,
    assignment: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = validate_name(&assignment.name, 200) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::validation_failed(vec![FieldError::new("name", msg)])));
    }

    let assignment = CreateAssignmentRequest {
        name: assignment.name.trim().to_string(),
        description: assignment.description,
    };

    match storage.create_assignment(class_id, user.id, assignment).await {
        Ok(assignment) => {
            info!(
                "Assignment {} created in class {} by {}",
                assignment.id, class_id, user.username
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to create assignment", e)),
    }
}
