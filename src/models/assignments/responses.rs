use serde::Serialize;

use crate::models::submissions::entities::Submission;

// 按学生分组的作业提交
#[derive(Debug, Serialize)]
pub struct StudentSubmissionGroup {
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub submission_count: usize,
    pub submissions: Vec<Submission>,
}
