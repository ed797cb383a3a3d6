use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PromptService;
use crate::models::ApiResponse;
use crate::models::prompts::requests::PromptListParams;
use crate::models::prompts::responses::PromptResponse;
use crate::services::access::{current_user, internal_error, require_class_member};

// 全局提示词加上调用者所在课程的提示词
pub async fn list_prompts(
    service: &PromptService,
    request: &HttpRequest,
    query: PromptListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let class_ids = match query.class_id {
        Some(class_id) => {
            if let Err(resp) = require_class_member(&storage, class_id, user.id).await {
                return Ok(resp);
            }
            vec![class_id]
        }
        None => match storage.list_user_class_ids(user.id, None).await {
            Ok(ids) => ids,
            Err(e) => return Ok(internal_error("Failed to list classes", e)),
        },
    };

    match storage.list_prompts(&class_ids).await {
        Ok(prompts) => {
            let prompts: Vec<PromptResponse> =
                prompts.into_iter().map(PromptResponse::from).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                prompts,
                "Prompts retrieved successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to list prompts", e)),
    }
}
