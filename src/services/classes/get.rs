use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::classes::responses::ClassDetailResponse;
use crate::models::users::entities::UserSummary;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::internal_error;

// 由 RequireClassRole::member() 保护
pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get class information", e)),
    };

    let members = match storage.list_class_members(class_id).await {
        Ok(members) => members,
        Err(e) => return Ok(internal_error("Failed to list class members", e)),
    };

    let assignments = match storage.list_class_assignments(class_id).await {
        Ok(assignments) => assignments,
        Err(e) => return Ok(internal_error("Failed to list assignments", e)),
    };

    let (professors, students): (Vec<_>, Vec<_>) =
        members.into_iter().partition(|(cu, _)| cu.is_professor());

    let response = ClassDetailResponse {
        class,
        professors: professors
            .into_iter()
            .map(|(_, user)| UserSummary::from(user))
            .collect(),
        students: students
            .into_iter()
            .map(|(_, user)| UserSummary::from(user))
            .collect(),
        assignments,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Class information retrieved successfully",
    )))
}
