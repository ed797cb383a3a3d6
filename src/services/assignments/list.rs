use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::services::access::internal_error;

// 由 RequireClassRole::member() 保护
pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_class_assignments(class_id).await {
        Ok(assignments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignments,
            "Assignments retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list assignments", e)),
    }
}
