use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::middlewares::RequireClassRole;
use crate::models::ApiResponse;
use crate::services::access::{current_user, internal_error};

// 由 RequireClassRole::member() 保护：教授看全部，学生只看自己的
pub async fn list_class_submissions(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let is_professor = RequireClassRole::extract_class_user(request)
        .map(|cu| cu.is_professor())
        .unwrap_or(false);

    match storage.list_class_submissions(class_id).await {
        Ok(submissions) => {
            let submissions: Vec<_> = if is_professor {
                submissions
            } else {
                submissions
                    .into_iter()
                    .filter(|s| s.student_id == user.id)
                    .collect()
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submissions,
                "Submissions retrieved successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to list class submissions", e)),
    }
}
