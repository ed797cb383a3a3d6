use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::class_users::entities::ClassUserRole;
use crate::models::classes::requests::{ClassListQuery, ClassQueryParams};
use crate::models::classes::responses::ClassListItem;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, PaginatedResponse};
use crate::services::access::{current_user, internal_error};

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let (page, size) = query.pagination.normalized();
    let list_query = ClassListQuery {
        page,
        size,
        search: query.search,
    };

    match user.role {
        // 教授只看自己授课的课程
        UserRole::Professor => {
            match storage
                .list_user_classes_with_pagination(user.id, ClassUserRole::Professor, list_query)
                .await
            {
                Ok(classes) => {
                    let items = classes
                        .items
                        .into_iter()
                        .map(|class| ClassListItem {
                            class,
                            is_enrolled: None,
                        })
                        .collect();
                    Ok(HttpResponse::Ok().json(ApiResponse::success(
                        PaginatedResponse {
                            items,
                            pagination: classes.pagination,
                        },
                        "Classes retrieved successfully",
                    )))
                }
                Err(e) => Ok(internal_error("Failed to list classes", e)),
            }
        }
        // 学生看全部课程，已选课程排在前面
        UserRole::Student => {
            let enrolled = match storage
                .list_user_class_ids(user.id, Some(ClassUserRole::Student))
                .await
            {
                Ok(ids) => ids,
                Err(e) => return Ok(internal_error("Failed to list enrollments", e)),
            };

            match storage.list_classes_with_pagination(list_query).await {
                Ok(classes) => {
                    let mut items: Vec<ClassListItem> = classes
                        .items
                        .into_iter()
                        .map(|class| {
                            let is_enrolled = enrolled.contains(&class.id);
                            ClassListItem {
                                class,
                                is_enrolled: Some(is_enrolled),
                            }
                        })
                        .collect();
                    // 稳定排序，保留名称顺序
                    items.sort_by_key(|item| !item.is_enrolled.unwrap_or(false));

                    Ok(HttpResponse::Ok().json(ApiResponse::success(
                        PaginatedResponse {
                            items,
                            pagination: classes.pagination,
                        },
                        "Classes retrieved successfully",
                    )))
                }
                Err(e) => Ok(internal_error("Failed to list classes", e)),
            }
        }
    }
}
