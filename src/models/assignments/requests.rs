use serde::Deserialize;

// 创建作业请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// 更新作业请求，未提供的字段保持不变
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}
