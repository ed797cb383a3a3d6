pub mod class_prompt;
pub mod create;
pub mod list;
pub mod template;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::prompts::requests::{
    AssignPromptRequest, CreatePromptRequest, EffectivePromptParams, PromptListParams,
    UpdatePromptRequest,
};
use crate::storage::Storage;

pub struct PromptService {
    storage: Option<Arc<dyn Storage>>,
}

impl PromptService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 内置默认模板
    pub async fn sample_prompt(&self) -> ActixResult<HttpResponse> {
        template::sample_prompt().await
    }

    // 课程当前生效的模板
    pub async fn effective_prompt(
        &self,
        request: &HttpRequest,
        query: EffectivePromptParams,
    ) -> ActixResult<HttpResponse> {
        template::effective_prompt(self, request, query).await
    }

    pub async fn list_prompts(
        &self,
        request: &HttpRequest,
        query: PromptListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_prompts(self, request, query).await
    }

    pub async fn create_prompt(
        &self,
        request: &HttpRequest,
        prompt: CreatePromptRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_prompt(self, request, prompt).await
    }

    pub async fn get_class_prompt(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        class_prompt::get_class_prompt(self, request, class_id).await
    }

    // 复制已有提示词到课程
    pub async fn assign_class_prompt(
        &self,
        request: &HttpRequest,
        class_id: i64,
        assign: AssignPromptRequest,
    ) -> ActixResult<HttpResponse> {
        class_prompt::assign_class_prompt(self, request, class_id, assign).await
    }

    pub async fn update_class_prompt(
        &self,
        request: &HttpRequest,
        class_id: i64,
        update: UpdatePromptRequest,
    ) -> ActixResult<HttpResponse> {
        class_prompt::update_class_prompt(self, request, class_id, update).await
    }
}

/// 标题与模板内容都不能为空，模板缺少占位符不算错误
pub(crate) fn validate_prompt_fields(
    title: &str,
    prompt: &str,
) -> Vec<crate::models::FieldError> {
    use crate::models::FieldError;
    use crate::utils::validate::validate_name;

    let mut errors = Vec::new();
    if let Err(msg) = validate_name(title, 200) {
        errors.push(FieldError::new("title", msg));
    }
    if prompt.trim().is_empty() {
        errors.push(FieldError::new("prompt", "This field is required"));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_placeholders_is_valid() {
        assert!(validate_prompt_fields("Title", "Grade this code.").is_empty());
        let fields: Vec<String> = validate_prompt_fields("", " ")
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["title", "prompt"]);
    }
}
