use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{PromptService, validate_prompt_fields};
use crate::models::ApiResponse;
use crate::models::prompts::requests::{CreatePromptRequest, NewGradingPrompt};
use crate::models::prompts::responses::PromptResponse;
use crate::services::access::{current_user, internal_error, require_class_professor};

pub async fn create_prompt(
    service: &PromptService,
    request: &HttpRequest,
    prompt: CreatePromptRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let errors = validate_prompt_fields(&prompt.title, &prompt.prompt);
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::validation_failed(errors)));
    }

    if let Some(class_id) = prompt.class_id
        && let Err(resp) = require_class_professor(&storage, class_id, user.id).await
    {
        return Ok(resp);
    }

    let new_prompt = NewGradingPrompt {
        title: prompt.title.trim().to_string(),
        prompt: prompt.prompt,
        class_id: prompt.class_id,
        created_by: Some(user.id),
    };

    match storage.create_prompt(new_prompt).await {
        Ok(created) => {
            let response = PromptResponse::from(created);
            if !response.missing_placeholders.is_empty() {
                warn!(
                    "Prompt {} saved without placeholders: {}",
                    response.prompt.id,
                    response.missing_placeholders.join(", ")
                );
            }
            info!("Prompt {} created by {}", response.prompt.id, user.username);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(response, "Prompt created successfully")))
        }
        Err(e) => Ok(internal_error("Failed to create prompt", e)),
    }
}
