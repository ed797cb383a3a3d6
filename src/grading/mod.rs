//! AI 评分
//!
//! 选取模板、渲染提示词、请求 AI 接口、解析分数与反馈，结果写回提交记录。
//! AI 调用失败只会把提交标记为 `failed`，不会让请求失败。

pub mod client;
pub mod parser;
pub mod template;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AiConfig;
use crate::errors::{GraderError, Result};
use crate::models::prompts::responses::{TemplateResponse, TemplateSource};
use crate::models::submissions::entities::Submission;
use crate::models::submissions::requests::GradingUpdate;
use crate::storage::Storage;

pub use client::CompletionClient;
pub use parser::ParsedGrade;

/// 提交代码最大字符数
pub const MAX_CODE_LENGTH: usize = 20_000;

/// 启动时写入的全局提示词标题
pub const DEFAULT_PROMPT_TITLE: &str = "Introduction to Python Class Prompt";

/// 内置默认模板
pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"As a Computer Science Professor Assistant, please analyze this Python code for the following assignment:

Assignment Description:
{description}

Please provide:
1. A grade (0-100)
2. Detailed feedback including:
   - Code quality assessment
   - Potential bugs or issues
   - Suggestions for improvement
   - Best practices followed or missing

Code to analyze:
```python
{code}
```

IMPORTANT: Your response MUST be in valid JSON format with this exact structure:
{
    "grade": <number>,
    "feedback": {
        "code_quality": "<assessment>",
        "bugs": ["<bug1>", "<bug2>", ...],
        "improvements": ["<suggestion1>", ...],
        "best_practices": ["<practice1>", ...]
    }
}

Do not include any text before or after the JSON structure."#;

#[derive(Debug, thiserror::Error)]
pub enum GradingError {
    #[error("AI grading is not configured")]
    NotConfigured,

    #[error("AI request timed out")]
    Timeout,

    #[error("AI request failed: {0}")]
    Network(String),

    #[error("AI endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),
}

pub struct GradingService {
    client: CompletionClient,
}

impl GradingService {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let client = CompletionClient::new(config)
            .map_err(|e| GraderError::validation(format!("Invalid AI configuration: {e}")))?;

        if !client.is_configured() {
            warn!("AI endpoint or API key not set, submissions will be flagged for manual review");
        }

        Ok(Self { client })
    }

    /// 评分时使用的模板：课程模板 → 系统全局模板 → 内置模板
    pub async fn resolve_template(
        storage: &Arc<dyn Storage>,
        class_id: i64,
    ) -> Result<TemplateResponse> {
        if let Some(prompt) = storage.get_latest_class_prompt(class_id).await? {
            return Ok(TemplateResponse {
                prompt: prompt.prompt,
                source: TemplateSource::Class,
                prompt_id: Some(prompt.id),
            });
        }

        if let Some(prompt) = storage.get_latest_global_prompt().await? {
            return Ok(TemplateResponse {
                prompt: prompt.prompt,
                source: TemplateSource::Global,
                prompt_id: Some(prompt.id),
            });
        }

        Ok(TemplateResponse {
            prompt: DEFAULT_PROMPT_TEMPLATE.to_string(),
            source: TemplateSource::Default,
            prompt_id: None,
        })
    }

    /// 渲染并请求一次 AI 评分
    pub async fn grade(
        &self,
        description: &str,
        code: &str,
        template: &str,
    ) -> std::result::Result<ParsedGrade, GradingError> {
        let missing = template::missing_placeholders(template);
        if !missing.is_empty() {
            warn!("Grading template is missing placeholders: {}", missing.join(", "));
        }

        let prompt = template::render_prompt(template, description, code);
        let body = self.client.complete(&prompt).await?;
        let content = parser::extract_content(&body)?;
        parser::parse_grade(&content)
    }

    /// 评分结果转换为写回的更新，失败不向上传播
    pub async fn grade_to_update(&self, description: &str, code: &str, template: &str) -> GradingUpdate {
        match self.grade(description, code, template).await {
            Ok(parsed) => GradingUpdate::Graded {
                grade: parsed.grade,
                feedback: parsed.feedback,
            },
            Err(e) => {
                warn!("AI grading failed, submission flagged for manual review: {e}");
                GradingUpdate::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// 对已保存的提交评分并写回
    ///
    /// 作业描述在评分时重新读取，保证使用当前描述。
    pub async fn grade_submission(
        &self,
        storage: &Arc<dyn Storage>,
        submission: &Submission,
    ) -> Result<Submission> {
        let assignment = storage
            .get_assignment_by_id(submission.assignment_id)
            .await?
            .ok_or_else(|| GraderError::not_found("Assignment not found"))?;
        let template = Self::resolve_template(storage, submission.class_id).await?;

        let update = self
            .grade_to_update(&assignment.description, &submission.code, &template.prompt)
            .await;
        if let GradingUpdate::Graded { grade, .. } = &update {
            info!(
                "Submission {} graded by AI: {grade} (template: {:?})",
                submission.id, template.source
            );
        }

        storage
            .apply_grading_update(submission.id, update)
            .await?
            .ok_or_else(|| GraderError::not_found("Submission not found"))
    }
}
