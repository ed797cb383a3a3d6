use serde::{Deserialize, Serialize};

// AI 评分状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GradingStatus {
    Pending, // 已保存，等待 AI 返回
    Graded,  // AI 评分成功
    Failed,  // AI 评分失败，需要教授人工评分
}

impl GradingStatus {
    pub const PENDING: &'static str = "pending";
    pub const GRADED: &'static str = "graded";
    pub const FAILED: &'static str = "failed";
}

impl<'de> Deserialize<'de> for GradingStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<GradingStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的评分状态: '{s}'. 支持的状态: pending, graded, failed"
            ))
        })
    }
}

impl std::fmt::Display for GradingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradingStatus::Pending => write!(f, "{}", GradingStatus::PENDING),
            GradingStatus::Graded => write!(f, "{}", GradingStatus::GRADED),
            GradingStatus::Failed => write!(f, "{}", GradingStatus::FAILED),
        }
    }
}

impl std::str::FromStr for GradingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            GradingStatus::PENDING => Ok(GradingStatus::Pending),
            GradingStatus::GRADED => Ok(GradingStatus::Graded),
            GradingStatus::FAILED => Ok(GradingStatus::Failed),
            _ => Err(format!("Invalid grading status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub class_id: i64,
    pub student_id: i64,
    // 原样保存的提交代码
    pub code: String,
    pub ai_grade: Option<f64>,
    pub ai_feedback: Option<String>,
    pub grading_status: GradingStatus,
    pub grading_error: Option<String>,
    pub professor_grade: Option<f64>,
    pub professor_feedback: Option<String>,
    // 教授评分优先，否则为 AI 评分
    pub final_grade: Option<f64>,
    pub needs_manual_review: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Submission {
    pub fn compute_final_grade(ai_grade: Option<f64>, professor_grade: Option<f64>) -> Option<f64> {
        professor_grade.or(ai_grade)
    }

    /// 没有 AI 分数且教授尚未评分
    ///
    /// 评分结果未能写回而停留在 pending 的提交同样需要人工评分。
    pub fn compute_needs_manual_review(
        status: GradingStatus,
        professor_grade: Option<f64>,
    ) -> bool {
        status != GradingStatus::Graded && professor_grade.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_grade_prefers_professor() {
        assert_eq!(Submission::compute_final_grade(Some(70.0), Some(90.0)), Some(90.0));
        assert_eq!(Submission::compute_final_grade(Some(70.0), None), Some(70.0));
        assert_eq!(Submission::compute_final_grade(None, None), None);
    }

    #[test]
    fn test_manual_review_flag() {
        assert!(Submission::compute_needs_manual_review(GradingStatus::Failed, None));
        assert!(!Submission::compute_needs_manual_review(GradingStatus::Failed, Some(80.0)));
        assert!(!Submission::compute_needs_manual_review(GradingStatus::Graded, None));
        assert!(Submission::compute_needs_manual_review(GradingStatus::Pending, None));
        assert!(!Submission::compute_needs_manual_review(GradingStatus::Pending, Some(55.0)));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("failed".parse::<GradingStatus>(), Ok(GradingStatus::Failed));
        assert!("done".parse::<GradingStatus>().is_err());
    }
}
