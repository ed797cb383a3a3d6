//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{GraderError, Result};
use crate::models::assignments::{
    entities::{Assignment, AssignmentDeletion},
    requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        class_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(class_id),
            name: Set(req.name),
            description: Set(req.description.unwrap_or_default()),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出课程下的作业
    pub async fn list_class_assignments_impl(&self, class_id: i64) -> Result<Vec<Assignment>> {
        let results = Assignments::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 更新作业
    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        // 先检查作业是否存在
        let existing = self.get_assignment_by_id_impl(assignment_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(assignment_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(description) = update.description {
            model.description = Set(description);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(Some(result.into_assignment()))
    }

    /// 删除作业
    ///
    /// 存在提交时不删除，计数与删除在同一事务内完成。
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<AssignmentDeletion> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GraderError::database_operation(format!("开启事务失败: {e}")))?;

        let exists = Assignments::find_by_id(assignment_id)
            .one(&txn)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询作业失败: {e}")))?
            .is_some();
        if !exists {
            return Ok(AssignmentDeletion::NotFound);
        }

        let submission_count = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .count(&txn)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询作业提交数量失败: {e}")))?;

        // 未提交的事务在 drop 时回滚
        if submission_count > 0 {
            return Ok(AssignmentDeletion::HasSubmissions(submission_count));
        }

        Assignments::delete_by_id(assignment_id)
            .exec(&txn)
            .await
            .map_err(|e| GraderError::database_operation(format!("删除作业失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| GraderError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(AssignmentDeletion::Deleted)
    }
}
