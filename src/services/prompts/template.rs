use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PromptService;
use crate::grading::{DEFAULT_PROMPT_TEMPLATE, GradingService};
use crate::models::ApiResponse;
use crate::models::prompts::requests::EffectivePromptParams;
use crate::models::prompts::responses::{TemplateResponse, TemplateSource};
use crate::services::access::{current_user, internal_error, require_class_member};

pub async fn sample_prompt() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TemplateResponse {
            prompt: DEFAULT_PROMPT_TEMPLATE.to_string(),
            source: TemplateSource::Default,
            prompt_id: None,
        },
        "Sample prompt retrieved successfully",
    )))
}

pub async fn effective_prompt(
    service: &PromptService,
    request: &HttpRequest,
    query: EffectivePromptParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = require_class_member(&storage, query.class_id, user.id).await {
        return Ok(resp);
    }

    match GradingService::resolve_template(&storage, query.class_id).await {
        Ok(template) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            template,
            "Effective prompt retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to resolve grading prompt", e)),
    }
}
