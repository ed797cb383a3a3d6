use serde::Serialize;

use super::entities::GradingPrompt;

/// 提示词及缺失占位符提示（缺失不会阻止保存）
#[derive(Debug, Serialize)]
pub struct PromptResponse {
    #[serde(flatten)]
    pub prompt: GradingPrompt,
    pub missing_placeholders: Vec<&'static str>,
}

impl From<GradingPrompt> for PromptResponse {
    fn from(prompt: GradingPrompt) -> Self {
        let missing_placeholders = crate::grading::template::missing_placeholders(&prompt.prompt);
        Self {
            prompt,
            missing_placeholders,
        }
    }
}

/// 模板来源
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSource {
    Class,
    Global,
    Default,
}

/// 评分时实际使用的模板
#[derive(Debug, Clone, Serialize)]
pub struct TemplateResponse {
    pub prompt: String,
    pub source: TemplateSource,
    pub prompt_id: Option<i64>,
}
