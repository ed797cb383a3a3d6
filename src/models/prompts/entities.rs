use serde::{Deserialize, Serialize};

// 评分提示词模板，class_id 为空表示全局模板
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingPrompt {
    pub id: i64,
    pub title: String,
    pub prompt: String,
    pub class_id: Option<i64>,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
