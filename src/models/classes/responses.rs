use super::entities::Class;
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::entities::{GradingStatus, Submission};
use crate::models::users::entities::UserSummary;
use serde::Serialize;

// 课程列表项，学生视角附带是否已选课
#[derive(Debug, Serialize)]
pub struct ClassListItem {
    #[serde(flatten)]
    pub class: Class,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enrolled: Option<bool>,
}

// 课程详情：成员与作业
#[derive(Debug, Serialize)]
pub struct ClassDetailResponse {
    #[serde(flatten)]
    pub class: Class,
    pub professors: Vec<UserSummary>,
    pub students: Vec<UserSummary>,
    pub assignments: Vec<Assignment>,
}

// 单个作业的评分统计
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentStats {
    pub assignment_id: i64,
    pub assignment_name: String,
    pub submission_count: u64,
    pub ai_graded_count: u64,
    pub needs_review_count: u64,
    pub professor_graded_count: u64,
    pub average_final_grade: Option<f64>,
}

impl AssignmentStats {
    /// 汇总某作业的提交，submissions 可以包含其他作业的提交
    pub fn from_submissions(assignment: &Assignment, submissions: &[Submission]) -> Self {
        let mut stats = Self {
            assignment_id: assignment.id,
            assignment_name: assignment.name.clone(),
            submission_count: 0,
            ai_graded_count: 0,
            needs_review_count: 0,
            professor_graded_count: 0,
            average_final_grade: None,
        };

        let mut grade_sum = 0.0;
        let mut graded = 0u64;
        for s in submissions.iter().filter(|s| s.assignment_id == assignment.id) {
            stats.submission_count += 1;
            if s.grading_status == GradingStatus::Graded {
                stats.ai_graded_count += 1;
            }
            if s.needs_manual_review {
                stats.needs_review_count += 1;
            }
            if s.professor_grade.is_some() {
                stats.professor_graded_count += 1;
            }
            if let Some(grade) = s.final_grade {
                grade_sum += grade;
                graded += 1;
            }
        }

        if graded > 0 {
            stats.average_final_grade = Some(grade_sum / graded as f64);
        }
        stats
    }
}

// 课程统计
#[derive(Debug, Serialize)]
pub struct ClassStatsResponse {
    pub class_id: i64,
    pub student_count: u64,
    pub assignments: Vec<AssignmentStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(
        id: i64,
        assignment_id: i64,
        status: GradingStatus,
        ai: Option<f64>,
        prof: Option<f64>,
    ) -> Submission {
        let now = chrono::Utc::now();
        Submission {
            id,
            assignment_id,
            class_id: 1,
            student_id: 10,
            code: "print(1)".to_string(),
            ai_grade: ai,
            ai_feedback: ai.map(|_| "ok".to_string()),
            grading_status: status,
            grading_error: None,
            professor_grade: prof,
            professor_feedback: None,
            final_grade: Submission::compute_final_grade(ai, prof),
            needs_manual_review: Submission::compute_needs_manual_review(status, prof),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_stats_counts_only_matching_assignment() {
        let now = chrono::Utc::now();
        let assignment = Assignment {
            id: 7,
            class_id: 1,
            name: "Loops".to_string(),
            description: String::new(),
            created_by: None,
            created_at: now,
            updated_at: now,
        };
        let submissions = vec![
            submission(1, 7, GradingStatus::Graded, Some(80.0), None),
            submission(2, 7, GradingStatus::Failed, None, None),
            submission(3, 7, GradingStatus::Failed, None, Some(60.0)),
            submission(4, 8, GradingStatus::Graded, Some(10.0), None),
        ];

        let stats = AssignmentStats::from_submissions(&assignment, &submissions);
        assert_eq!(stats.submission_count, 3);
        assert_eq!(stats.ai_graded_count, 1);
        assert_eq!(stats.needs_review_count, 1);
        assert_eq!(stats.professor_graded_count, 1);
        assert_eq!(stats.average_final_grade, Some(70.0));
    }
}
