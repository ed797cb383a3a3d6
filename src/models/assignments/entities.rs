use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub class_id: i64,
    pub name: String,
    // 作业描述，评分时作为 {description} 代入提示词
    pub description: String,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 删除作业的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentDeletion {
    Deleted,
    NotFound,
    // 仍有提交引用该作业，未做任何修改
    HasSubmissions(u64),
}
