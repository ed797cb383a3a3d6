use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{PromptService, validate_prompt_fields};
use crate::models::prompts::requests::{AssignPromptRequest, NewGradingPrompt, UpdatePromptRequest};
use crate::models::prompts::responses::PromptResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{class_membership, current_user, forbidden, internal_error};

fn prompt_not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::PromptNotFound, message))
}

// 由 RequireClassRole::member() 保护
pub async fn get_class_prompt(
    service: &PromptService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_latest_class_prompt(class_id).await {
        Ok(Some(prompt)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PromptResponse::from(prompt),
            "Class prompt retrieved successfully",
        ))),
        Ok(None) => Ok(prompt_not_found("No prompt configured for this class")),
        Err(e) => Ok(internal_error("Failed to get class prompt", e)),
    }
}

// 由 RequireClassRole::new(Professor) 保护
pub async fn assign_class_prompt(
    service: &PromptService,
    request: &HttpRequest,
    class_id: i64,
    assign: AssignPromptRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let source = match storage.get_prompt_by_id(assign.prompt_id).await {
        Ok(Some(prompt)) => prompt,
        Ok(None) => return Ok(prompt_not_found("Prompt not found")),
        Err(e) => return Ok(internal_error("Failed to load prompt", e)),
    };

    // 只能复制全局提示词或自己所在课程的提示词
    if let Some(source_class) = source.class_id {
        match class_membership(&storage, source_class, user.id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(forbidden("You cannot use a prompt from another class")),
            Err(resp) => return Ok(resp),
        }
    }

    let new_prompt = NewGradingPrompt {
        title: source.title,
        prompt: source.prompt,
        class_id: Some(class_id),
        created_by: Some(user.id),
    };

    match storage.create_prompt(new_prompt).await {
        Ok(created) => {
            info!(
                "Prompt {} assigned to class {} as {} by {}",
                assign.prompt_id, class_id, created.id, user.username
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                PromptResponse::from(created),
                "Prompt assigned to class",
            )))
        }
        Err(e) => Ok(internal_error("Failed to assign prompt", e)),
    }
}

// 由 RequireClassRole::new(Professor) 保护
pub async fn update_class_prompt(
    service: &PromptService,
    request: &HttpRequest,
    class_id: i64,
    update: UpdatePromptRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let errors = validate_prompt_fields(&update.title, &update.prompt);
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::validation_failed(errors)));
    }

    let current = match storage.get_latest_class_prompt(class_id).await {
        Ok(Some(prompt)) => prompt,
        Ok(None) => return Ok(prompt_not_found("No prompt configured for this class")),
        Err(e) => return Ok(internal_error("Failed to get class prompt", e)),
    };

    match storage
        .update_prompt(current.id, update.title.trim(), &update.prompt)
        .await
    {
        Ok(Some(updated)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PromptResponse::from(updated),
            "Class prompt updated",
        ))),
        Ok(None) => Ok(prompt_not_found("Prompt not found")),
        Err(e) => Ok(internal_error("Failed to update class prompt", e)),
    }
}
