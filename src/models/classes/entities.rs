use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    // 课程ID
    pub id: i64,
    // 课程名称
    pub name: String,
    // 课程代码，全局唯一
    pub code: String,
    pub description: Option<String>,
    // 先修要求
    pub prerequisites: Option<String>,
    // 学习目标
    pub learning_objectives: Option<String>,
    // 创建者（教授）ID
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
