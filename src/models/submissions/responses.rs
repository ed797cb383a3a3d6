use serde::Serialize;

use crate::models::assignments::entities::Assignment;
use crate::models::submissions::entities::Submission;

/// 提交详情，附带作业信息
#[derive(Debug, Serialize)]
pub struct SubmissionDetailResponse {
    #[serde(flatten)]
    pub submission: Submission,
    pub assignment: Option<Assignment>,
}

/// 教授评分结果
#[derive(Debug, Serialize)]
pub struct ProfessorGradeResponse {
    pub submission_id: i64,
    pub professor_grade: Option<f64>,
    pub professor_feedback: Option<String>,
    pub final_grade: Option<f64>,
}
