//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod class_users;
mod classes;
mod prompts;
mod submissions;
mod users;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{GraderError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database.url, &config.database).await
    }

    /// 连接指定数据库并运行迁移
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| GraderError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + 外键约束）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GraderError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| GraderError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| GraderError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GraderError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse,
    assignments::{
        entities::{Assignment, AssignmentDeletion},
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::StudentSubmissionGroup,
    },
    class_users::entities::{ClassUser, ClassUserRole},
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest},
    },
    prompts::{entities::GradingPrompt, requests::NewGradingPrompt},
    submissions::{
        entities::Submission,
        requests::{GradingUpdate, SubmissionListQuery},
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn update_user_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        self.update_user_password_impl(id, password_hash).await
    }

    // 课程模块
    async fn create_class(&self, created_by: i64, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(created_by, class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_by_code(&self, code: &str) -> Result<Option<Class>> {
        self.get_class_by_code_impl(code).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn list_user_classes_with_pagination(
        &self,
        user_id: i64,
        role: ClassUserRole,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>> {
        self.list_user_classes_with_pagination_impl(user_id, role, query)
            .await
    }

    // 课程成员模块
    async fn join_class(
        &self,
        user_id: i64,
        class_id: i64,
        role: ClassUserRole,
    ) -> Result<ClassUser> {
        self.join_class_impl(user_id, class_id, role).await
    }

    async fn get_class_user(&self, class_id: i64, user_id: i64) -> Result<Option<ClassUser>> {
        self.get_class_user_impl(class_id, user_id).await
    }

    async fn list_class_members(&self, class_id: i64) -> Result<Vec<(ClassUser, User)>> {
        self.list_class_members_impl(class_id).await
    }

    async fn list_user_class_ids(
        &self,
        user_id: i64,
        role: Option<ClassUserRole>,
    ) -> Result<Vec<i64>> {
        self.list_user_class_ids_impl(user_id, role).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        class_id: i64,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(class_id, created_by, assignment)
            .await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_class_assignments(&self, class_id: i64) -> Result<Vec<Assignment>> {
        self.list_class_assignments_impl(class_id).await
    }

    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(assignment_id, update).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<AssignmentDeletion> {
        self.delete_assignment_impl(assignment_id).await
    }

    // 提交模块
    async fn create_submission(
        &self,
        student_id: i64,
        class_id: i64,
        assignment_id: i64,
        code: &str,
    ) -> Result<Submission> {
        self.create_submission_impl(student_id, class_id, assignment_id, code)
            .await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<Submission>> {
        self.list_submissions_with_pagination_impl(query).await
    }

    async fn list_class_submissions(&self, class_id: i64) -> Result<Vec<Submission>> {
        self.list_class_submissions_impl(class_id).await
    }

    async fn list_assignment_submissions_by_student(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<StudentSubmissionGroup>> {
        self.list_assignment_submissions_by_student_impl(assignment_id)
            .await
    }

    async fn apply_grading_update(
        &self,
        submission_id: i64,
        update: GradingUpdate,
    ) -> Result<Option<Submission>> {
        self.apply_grading_update_impl(submission_id, update).await
    }

    async fn set_professor_grade(
        &self,
        submission_id: i64,
        grade: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        self.set_professor_grade_impl(submission_id, grade, feedback)
            .await
    }

    // 提示词模块
    async fn create_prompt(&self, prompt: NewGradingPrompt) -> Result<GradingPrompt> {
        self.create_prompt_impl(prompt).await
    }

    async fn get_prompt_by_id(&self, prompt_id: i64) -> Result<Option<GradingPrompt>> {
        self.get_prompt_by_id_impl(prompt_id).await
    }

    async fn get_latest_class_prompt(&self, class_id: i64) -> Result<Option<GradingPrompt>> {
        self.get_latest_class_prompt_impl(class_id).await
    }

    async fn get_latest_global_prompt(&self) -> Result<Option<GradingPrompt>> {
        self.get_latest_global_prompt_impl().await
    }

    async fn list_prompts(&self, class_ids: &[i64]) -> Result<Vec<GradingPrompt>> {
        self.list_prompts_impl(class_ids).await
    }

    async fn update_prompt(
        &self,
        prompt_id: i64,
        title: &str,
        prompt: &str,
    ) -> Result<Option<GradingPrompt>> {
        self.update_prompt_impl(prompt_id, title, prompt).await
    }

    async fn seed_global_prompt(&self, title: &str, prompt: &str) -> Result<bool> {
        self.seed_global_prompt_impl(title, prompt).await
    }
}
