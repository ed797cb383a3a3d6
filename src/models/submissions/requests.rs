use serde::Deserialize;

use crate::models::common::{PaginationQuery, pagination::deserialize_optional_string_to_i64};

// 创建提交请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmissionRequest {
    pub assignment_id: i64,
    pub code: String,
}

// 教授评分请求
#[derive(Debug, Clone, Deserialize)]
pub struct ProfessorGradeRequest {
    pub grade: f64,
    pub feedback: Option<String>,
}

// 提交列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct SubmissionListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub assignment_id: Option<i64>,
}

// 提交列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct SubmissionListQuery {
    pub page: u64,
    pub size: u64,
    // 只看某个学生的提交
    pub student_id: Option<i64>,
    // 只看这些课程的提交（教授视角）
    pub class_ids: Option<Vec<i64>>,
    pub class_id: Option<i64>,
    pub assignment_id: Option<i64>,
}

/// 提交代码时的 AI 评分结果写回
#[derive(Debug, Clone)]
pub enum GradingUpdate {
    Graded { grade: f64, feedback: String },
    Failed { error: String },
}
