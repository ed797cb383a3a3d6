use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ClassService;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::{ApiResponse, ErrorCode, FieldError};
use crate::services::access::{current_user, internal_error};
use crate::utils::validate::{validate_class_code, validate_name};

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 字段校验
    let errors = validate_create_request(&class_data);
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::validation_failed(errors)));
    }

    // 课程代码唯一
    if let Some(code) = class_data.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        match storage.get_class_by_code(code).await {
            Ok(Some(_)) => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::ClassAlreadyExists,
                    format!("Class code '{code}' already exists"),
                )));
            }
            Ok(None) => {}
            Err(e) => return Ok(internal_error("Failed to check class code", e)),
        }
    }

    let class_data = CreateClassRequest {
        name: class_data.name.trim().to_string(),
        ..class_data
    };

    match storage.create_class(user.id, class_data).await {
        Ok(class) => {
            info!("Class {} ({}) created by {}", class.name, class.code, user.username);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(class, "Class created successfully")))
        }
        Err(e) => Ok(handle_class_create_error(&e.to_string())),
    }
}

fn validate_create_request(class_data: &CreateClassRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Err(msg) = validate_name(&class_data.name, 100) {
        errors.push(FieldError::new("name", msg));
    }
    if let Some(code) = class_data.code.as_deref().map(str::trim).filter(|c| !c.is_empty())
        && let Err(msg) = validate_class_code(code)
    {
        errors.push(FieldError::new("code", msg));
    }
    errors
}

/// 错误响应辅助函数
fn handle_class_create_error(e: &str) -> HttpResponse {
    let msg = format!("Class creation failed: {e}");
    error!("{}", msg);
    if msg.contains("UNIQUE constraint failed") || msg.contains("duplicate key") {
        HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ClassAlreadyExists,
            "Class code already exists",
        ))
    } else {
        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::ClassCreationFailed,
            "Class creation failed",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_validation() {
        let req = CreateClassRequest {
            name: "   ".to_string(),
            code: Some("bad code!".to_string()),
            description: None,
            prerequisites: None,
            learning_objectives: None,
        };
        let fields: Vec<String> = validate_create_request(&req)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["name", "code"]);
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let resp = handle_class_create_error("UNIQUE constraint failed: classes.code");
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);
        let resp = handle_class_create_error("disk full");
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
