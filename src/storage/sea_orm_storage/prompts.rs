//! 评分提示词存储操作

use super::SeaOrmStorage;
use crate::entity::grading_prompts::{ActiveModel, Column, Entity as GradingPrompts};
use crate::errors::{GraderError, Result};
use crate::models::prompts::{entities::GradingPrompt, requests::NewGradingPrompt};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建提示词
    pub async fn create_prompt_impl(&self, req: NewGradingPrompt) -> Result<GradingPrompt> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title),
            prompt: Set(req.prompt),
            class_id: Set(req.class_id),
            created_by: Set(req.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("创建提示词失败: {e}")))?;

        Ok(result.into_grading_prompt())
    }

    /// 通过 ID 获取提示词
    pub async fn get_prompt_by_id_impl(&self, prompt_id: i64) -> Result<Option<GradingPrompt>> {
        let result = GradingPrompts::find_by_id(prompt_id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询提示词失败: {e}")))?;

        Ok(result.map(|m| m.into_grading_prompt()))
    }

    /// 课程最新的提示词
    pub async fn get_latest_class_prompt_impl(
        &self,
        class_id: i64,
    ) -> Result<Option<GradingPrompt>> {
        let result = GradingPrompts::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询课程提示词失败: {e}")))?;

        Ok(result.map(|m| m.into_grading_prompt()))
    }

    /// 最新的系统全局提示词
    ///
    /// 只取启动时写入的提示词（created_by 为空），教授创建的全局提示词
    /// 仅供复制到自己的课程，不参与其他课程的评分。
    pub async fn get_latest_global_prompt_impl(&self) -> Result<Option<GradingPrompt>> {
        let result = GradingPrompts::find()
            .filter(Column::ClassId.is_null())
            .filter(Column::CreatedBy.is_null())
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询全局提示词失败: {e}")))?;

        Ok(result.map(|m| m.into_grading_prompt()))
    }

    /// 列出全局提示词及指定课程的提示词，最新在前
    pub async fn list_prompts_impl(&self, class_ids: &[i64]) -> Result<Vec<GradingPrompt>> {
        let mut visible = Condition::any().add(Column::ClassId.is_null());
        if !class_ids.is_empty() {
            visible = visible.add(Column::ClassId.is_in(class_ids.iter().copied()));
        }

        let results = GradingPrompts::find()
            .filter(visible)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询提示词列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_grading_prompt()).collect())
    }

    /// 修改提示词内容
    pub async fn update_prompt_impl(
        &self,
        prompt_id: i64,
        title: &str,
        prompt: &str,
    ) -> Result<Option<GradingPrompt>> {
        let existing = self.get_prompt_by_id_impl(prompt_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let result = ActiveModel {
            id: Set(prompt_id),
            title: Set(title.to_string()),
            prompt: Set(prompt.to_string()),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| GraderError::database_operation(format!("更新提示词失败: {e}")))?;

        Ok(Some(result.into_grading_prompt()))
    }

    /// 写入内置全局提示词（已存在相同内容时跳过）
    pub async fn seed_global_prompt_impl(&self, title: &str, prompt: &str) -> Result<bool> {
        let existing = GradingPrompts::find()
            .filter(Column::ClassId.is_null())
            .filter(Column::CreatedBy.is_null())
            .filter(Column::Prompt.eq(prompt))
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询全局提示词失败: {e}")))?;

        if existing.is_some() {
            return Ok(false);
        }

        self.create_prompt_impl(NewGradingPrompt {
            title: title.to_string(),
            prompt: prompt.to_string(),
            class_id: None,
            created_by: None,
        })
        .await?;

        Ok(true)
    }
}
