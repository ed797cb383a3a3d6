use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::prompts::requests::{
    AssignPromptRequest, CreatePromptRequest, EffectivePromptParams, PromptListParams,
    UpdatePromptRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::PromptService;
use crate::utils::SafeClassIdI64;

// 懒加载的全局 PROMPT_SERVICE 实例
static PROMPT_SERVICE: Lazy<PromptService> = Lazy::new(PromptService::new_lazy);

pub async fn sample_prompt() -> ActixResult<HttpResponse> {
    PROMPT_SERVICE.sample_prompt().await
}

pub async fn effective_prompt(
    req: HttpRequest,
    query: web::Query<EffectivePromptParams>,
) -> ActixResult<HttpResponse> {
    PROMPT_SERVICE
        .effective_prompt(&req, query.into_inner())
        .await
}

pub async fn list_prompts(
    req: HttpRequest,
    query: web::Query<PromptListParams>,
) -> ActixResult<HttpResponse> {
    PROMPT_SERVICE.list_prompts(&req, query.into_inner()).await
}

pub async fn create_prompt(
    req: HttpRequest,
    prompt: web::Json<CreatePromptRequest>,
) -> ActixResult<HttpResponse> {
    PROMPT_SERVICE.create_prompt(&req, prompt.into_inner()).await
}

// 以下三个处理程序挂在 /api/v1/classes/{class_id}/prompt
pub async fn get_class_prompt(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    PROMPT_SERVICE.get_class_prompt(&req, class_id.0).await
}

pub async fn assign_class_prompt(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    assign: web::Json<AssignPromptRequest>,
) -> ActixResult<HttpResponse> {
    PROMPT_SERVICE
        .assign_class_prompt(&req, class_id.0, assign.into_inner())
        .await
}

pub async fn update_class_prompt(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    update: web::Json<UpdatePromptRequest>,
) -> ActixResult<HttpResponse> {
    PROMPT_SERVICE
        .update_class_prompt(&req, class_id.0, update.into_inner())
        .await
}

// 配置路由
pub fn configure_prompts_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grading")
            .wrap(middlewares::RequireJWT)
            .route("/sample-prompt", web::get().to(sample_prompt))
            .route("/effective-prompt", web::get().to(effective_prompt)),
    )
    .service(
        web::scope("/api/v1/prompts")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_prompts))
                    .route(
                        web::post()
                            .to(create_prompt)
                            .wrap(middlewares::RequireRole::new(&UserRole::Professor)),
                    ),
            ),
    );
}
