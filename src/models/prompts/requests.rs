use serde::Deserialize;

use crate::models::common::pagination::deserialize_optional_string_to_i64;

// 创建提示词请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePromptRequest {
    pub title: String,
    pub prompt: String,
    pub class_id: Option<i64>,
}

// 编辑课程提示词请求
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePromptRequest {
    pub title: String,
    pub prompt: String,
}

// 将已有提示词复制到课程
#[derive(Debug, Clone, Deserialize)]
pub struct AssignPromptRequest {
    pub prompt_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PromptListParams {
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub class_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct EffectivePromptParams {
    pub class_id: i64,
}

// 新建提示词（用于存储层）
#[derive(Debug, Clone)]
pub struct NewGradingPrompt {
    pub title: String,
    pub prompt: String,
    pub class_id: Option<i64>,
    pub created_by: Option<i64>,
}
