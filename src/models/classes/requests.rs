use crate::models::common::PaginationQuery;
use serde::Deserialize;

// 课程查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct ClassQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 创建课程请求
//
// code 为空时自动生成
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub prerequisites: Option<String>,
    pub learning_objectives: Option<String>,
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: u64,
    pub size: u64,
    pub search: Option<String>,
}
