use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::class_users::entities::{ClassUser, ClassUserRole};
use crate::models::class_users::responses::ClassMembershipResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{class_membership, current_user, internal_error};

fn membership_response(class_user: ClassUser) -> ClassMembershipResponse {
    ClassMembershipResponse {
        class_id: class_user.class_id,
        user_id: class_user.user_id,
        role: class_user.role,
        joined_at: class_user.joined_at,
    }
}

pub async fn enroll_student(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get class information", e)),
    }

    match class_membership(&storage, class_id, user.id).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ClassAlreadyJoined,
                "Already enrolled in this class",
            )));
        }
        Ok(None) => {}
        Err(resp) => return Ok(resp),
    }

    match storage
        .join_class(user.id, class_id, ClassUserRole::Student)
        .await
    {
        Ok(class_user) => {
            info!("Student {} enrolled in class {}", user.username, class_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                membership_response(class_user),
                "Enrolled successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to enroll in class", e)),
    }
}

// 由 RequireClassRole::new(Professor) 保护
pub async fn add_professor(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let target = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to load user", e)),
    };

    if !target.is_professor() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserRoleInvalid,
            "Only professor accounts can be added as class professors",
        )));
    }

    match class_membership(&storage, class_id, user_id).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ClassAlreadyJoined,
                "User is already a member of this class",
            )));
        }
        Ok(None) => {}
        Err(resp) => return Ok(resp),
    }

    match storage
        .join_class(user_id, class_id, ClassUserRole::Professor)
        .await
    {
        Ok(class_user) => {
            info!("Professor {} added to class {}", target.username, class_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                membership_response(class_user),
                "Professor added to class",
            )))
        }
        Err(e) => Ok(internal_error("Failed to add professor", e)),
    }
}
