//! 课程成员存储操作

use super::SeaOrmStorage;
use crate::entity::class_users::{ActiveModel, Column, Entity as ClassUsers};
use crate::entity::users::Entity as Users;
use crate::errors::{GraderError, Result};
use crate::models::{
    class_users::entities::{ClassUser, ClassUserRole},
    users::entities::User,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 加入课程
    pub async fn join_class_impl(
        &self,
        user_id: i64,
        class_id: i64,
        role: ClassUserRole,
    ) -> Result<ClassUser> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(class_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            joined_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("加入课程失败: {e}")))?;

        Ok(result.into_class_user())
    }

    /// 获取用户在课程中的身份
    pub async fn get_class_user_impl(
        &self,
        class_id: i64,
        user_id: i64,
    ) -> Result<Option<ClassUser>> {
        let result = ClassUsers::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询课程成员失败: {e}")))?;

        Ok(result.map(|m| m.into_class_user()))
    }

    /// 列出课程成员（按加入时间）
    pub async fn list_class_members_impl(&self, class_id: i64) -> Result<Vec<(ClassUser, User)>> {
        let rows = ClassUsers::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::JoinedAt)
            .order_by_asc(Column::Id)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询课程成员失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(cu, user)| user.map(|u| (cu.into_class_user(), u.into_user())))
            .collect())
    }

    /// 列出用户参与的课程 ID
    pub async fn list_user_class_ids_impl(
        &self,
        user_id: i64,
        role: Option<ClassUserRole>,
    ) -> Result<Vec<i64>> {
        let mut select = ClassUsers::find().filter(Column::UserId.eq(user_id));
        if let Some(role) = role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        let rows = select
            .all(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询用户课程关联失败: {e}")))?;

        Ok(rows.into_iter().map(|cu| cu.class_id).collect())
    }
}
