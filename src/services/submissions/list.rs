use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::ApiResponse;
use crate::models::class_users::entities::ClassUserRole;
use crate::models::submissions::requests::{SubmissionListParams, SubmissionListQuery};
use crate::models::users::entities::UserRole;
use crate::services::access::{current_user, internal_error};

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    query: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let (page, size) = query.pagination.normalized();
    let mut list_query = SubmissionListQuery {
        page,
        size,
        class_id: query.class_id,
        assignment_id: query.assignment_id,
        ..Default::default()
    };

    match user.role {
        UserRole::Student => list_query.student_id = Some(user.id),
        // 教授只能看到自己授课课程中的提交
        UserRole::Professor => {
            match storage
                .list_user_class_ids(user.id, Some(ClassUserRole::Professor))
                .await
            {
                Ok(ids) => list_query.class_ids = Some(ids),
                Err(e) => return Ok(internal_error("Failed to list classes", e)),
            }
        }
    }

    match storage.list_submissions_with_pagination(list_query).await {
        Ok(submissions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            submissions,
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list submissions", e)),
    }
}
