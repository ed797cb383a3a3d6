//! 提交存储操作

use std::collections::BTreeMap;

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::Entity as Users;
use crate::errors::{GraderError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    assignments::responses::StudentSubmissionGroup,
    submissions::{
        entities::{GradingStatus, Submission},
        requests::{GradingUpdate, SubmissionListQuery},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建提交，初始状态为待评分
    pub async fn create_submission_impl(
        &self,
        student_id: i64,
        class_id: i64,
        assignment_id: i64,
        code: &str,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            class_id: Set(class_id),
            student_id: Set(student_id),
            code: Set(code.to_string()),
            grading_status: Set(GradingStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出提交（分页）
    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<Submission>> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = Submissions::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        // 可见课程范围
        if let Some(class_ids) = query.class_ids {
            if class_ids.is_empty() {
                return Ok(PaginatedResponse {
                    items: vec![],
                    pagination: PaginationInfo::new(page, size, 0),
                });
            }
            select = select.filter(Column::ClassId.is_in(class_ids));
        }

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        if let Some(assignment_id) = query.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GraderError::database_operation(format!("查询提交总数失败: {e}")))?;

        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: submissions
                .into_iter()
                .map(|m| m.into_submission())
                .collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 列出课程的全部提交
    pub async fn list_class_submissions_impl(&self, class_id: i64) -> Result<Vec<Submission>> {
        let results = Submissions::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询课程提交失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 按学生分组列出作业提交，组按用户名排序，组内最新在前
    pub async fn list_assignment_submissions_by_student_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<StudentSubmissionGroup>> {
        let rows = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询作业提交失败: {e}")))?;

        let mut groups: BTreeMap<(String, i64), StudentSubmissionGroup> = BTreeMap::new();
        for (submission, student) in rows {
            let (username, display_name) = match student {
                Some(u) => (u.username, u.display_name),
                None => (format!("user-{}", submission.student_id), None),
            };
            let group = groups
                .entry((username.clone(), submission.student_id))
                .or_insert_with(|| StudentSubmissionGroup {
                    user_id: submission.student_id,
                    username,
                    display_name,
                    submission_count: 0,
                    submissions: Vec::new(),
                });
            group.submission_count += 1;
            group.submissions.push(submission.into_submission());
        }

        Ok(groups.into_values().collect())
    }

    /// 写回 AI 评分结果
    ///
    /// 评分、反馈、状态在一条 UPDATE 中写入；失败时 AI 字段置空。
    pub async fn apply_grading_update_impl(
        &self,
        submission_id: i64,
        update: GradingUpdate,
    ) -> Result<Option<Submission>> {
        let existing = self.get_submission_by_id_impl(submission_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let model = match update {
            GradingUpdate::Graded { grade, feedback } => ActiveModel {
                id: Set(submission_id),
                ai_grade: Set(Some(grade)),
                ai_feedback: Set(Some(feedback)),
                grading_status: Set(GradingStatus::Graded.to_string()),
                grading_error: Set(None),
                updated_at: Set(now),
                ..Default::default()
            },
            GradingUpdate::Failed { error } => ActiveModel {
                id: Set(submission_id),
                ai_grade: Set(None),
                ai_feedback: Set(None),
                grading_status: Set(GradingStatus::Failed.to_string()),
                grading_error: Set(Some(error)),
                updated_at: Set(now),
                ..Default::default()
            },
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("写入评分结果失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }

    /// 教授评分
    pub async fn set_professor_grade_impl(
        &self,
        submission_id: i64,
        grade: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        let existing = self.get_submission_by_id_impl(submission_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let result = ActiveModel {
            id: Set(submission_id),
            professor_grade: Set(Some(grade)),
            professor_feedback: Set(feedback),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| GraderError::database_operation(format!("写入教授评分失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }
}
