//! 课程存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::ActiveModel as AssignmentActiveModel;
use crate::entity::class_users::{
    ActiveModel as ClassUserActiveModel, Column as ClassUserColumn, Entity as ClassUsers,
};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{GraderError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    class_users::entities::ClassUserRole,
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest},
    },
};
use crate::utils::{escape_like_pattern, random_code::generate_class_code};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
    Set, TransactionTrait,
};

/// 新建课程时自动创建的作业
const DEFAULT_ASSIGNMENTS: [(&str, &str); 2] = [
    ("Assignment 1", "First assignment of the course"),
    ("Assignment 2", "Second assignment of the course"),
];

impl SeaOrmStorage {
    /// 创建课程
    ///
    /// 课程、创建者的教授身份和默认作业在同一事务内写入。
    pub async fn create_class_impl(&self, created_by: i64, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();
        let code = req
            .code
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(generate_class_code);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GraderError::database_operation(format!("开启事务失败: {e}")))?;

        let class = ActiveModel {
            name: Set(req.name),
            code: Set(code),
            description: Set(req.description),
            prerequisites: Set(req.prerequisites),
            learning_objectives: Set(req.learning_objectives),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| GraderError::database_operation(format!("创建课程失败: {e}")))?;

        ClassUserActiveModel {
            class_id: Set(class.id),
            user_id: Set(created_by),
            role: Set(ClassUserRole::Professor.to_string()),
            joined_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| GraderError::database_operation(format!("添加课程教授失败: {e}")))?;

        for (name, description) in DEFAULT_ASSIGNMENTS {
            AssignmentActiveModel {
                class_id: Set(class.id),
                name: Set(name.to_string()),
                description: Set(description.to_string()),
                created_by: Set(Some(created_by)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| GraderError::database_operation(format!("创建默认作业失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| GraderError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(class.into_class())
    }

    /// 通过 ID 获取课程
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 通过课程代码获取课程
    pub async fn get_class_by_code_impl(&self, code: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出所有课程
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>> {
        self.paginate_classes(Classes::find(), query).await
    }

    /// 分页列出用户以指定身份参与的课程
    pub async fn list_user_classes_with_pagination_impl(
        &self,
        user_id: i64,
        role: ClassUserRole,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>> {
        let class_ids: Vec<i64> = ClassUsers::find()
            .filter(ClassUserColumn::UserId.eq(user_id))
            .filter(ClassUserColumn::Role.eq(role.to_string()))
            .all(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询用户课程关联失败: {e}")))?
            .into_iter()
            .map(|cu| cu.class_id)
            .collect();

        if class_ids.is_empty() {
            return Ok(PaginatedResponse {
                items: vec![],
                pagination: PaginationInfo::new(query.page.max(1), query.size.max(1), 0),
            });
        }

        self.paginate_classes(Classes::find().filter(Column::Id.is_in(class_ids)), query)
            .await
    }

    async fn paginate_classes(
        &self,
        mut select: Select<Classes>,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                sea_orm::Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Code.contains(&escaped)),
            );
        }

        select = select.order_by_asc(Column::Name).order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GraderError::database_operation(format!("查询课程总数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }
}
