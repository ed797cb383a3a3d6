use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 重置密码
    async fn update_user_password(&self, id: i64, password_hash: &str) -> Result<bool>;

    /// 课程管理方法
    // 创建课程，同时写入创建者的教授身份与默认作业
    async fn create_class(&self, created_by: i64, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取课程信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 通过课程代码获取课程信息
    async fn get_class_by_code(&self, code: &str) -> Result<Option<Class>>;
    // 列出所有课程
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>>;
    // 列出用户以指定身份参与的课程
    async fn list_user_classes_with_pagination(
        &self,
        user_id: i64,
        role: ClassUserRole,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>>;

    /// 课程成员管理方法
    // 加入课程
    async fn join_class(
        &self,
        user_id: i64,
        class_id: i64,
        role: ClassUserRole,
    ) -> Result<ClassUser>;
    // 获取用户在课程中的身份
    async fn get_class_user(&self, class_id: i64, user_id: i64) -> Result<Option<ClassUser>>;
    // 列出课程成员及其用户信息
    async fn list_class_members(&self, class_id: i64) -> Result<Vec<(ClassUser, User)>>;
    // 列出用户参与的课程 ID，role 为空时不区分身份
    async fn list_user_class_ids(
        &self,
        user_id: i64,
        role: Option<ClassUserRole>,
    ) -> Result<Vec<i64>>;

    /// 作业管理方法
    async fn create_assignment(
        &self,
        class_id: i64,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_class_assignments(&self, class_id: i64) -> Result<Vec<Assignment>>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 存在提交时拒绝删除，检查与删除在同一事务内
    async fn delete_assignment(&self, assignment_id: i64) -> Result<AssignmentDeletion>;

    /// 提交管理方法
    // 创建待评分的提交
    async fn create_submission(
        &self,
        student_id: i64,
        class_id: i64,
        assignment_id: i64,
        code: &str,
    ) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<Submission>>;
    async fn list_class_submissions(&self, class_id: i64) -> Result<Vec<Submission>>;
    // 按学生分组列出某作业的提交
    async fn list_assignment_submissions_by_student(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<StudentSubmissionGroup>>;
    // 写回 AI 评分结果
    async fn apply_grading_update(
        &self,
        submission_id: i64,
        update: GradingUpdate,
    ) -> Result<Option<Submission>>;
    // 教授评分
    async fn set_professor_grade(
        &self,
        submission_id: i64,
        grade: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>>;

    /// 评分提示词管理方法
    async fn create_prompt(&self, prompt: NewGradingPrompt) -> Result<GradingPrompt>;
    async fn get_prompt_by_id(&self, prompt_id: i64) -> Result<Option<GradingPrompt>>;
    // 课程最新的提示词
    async fn get_latest_class_prompt(&self, class_id: i64) -> Result<Option<GradingPrompt>>;
    // 最新的系统全局提示词（不含教授创建的共享提示词）
    async fn get_latest_global_prompt(&self) -> Result<Option<GradingPrompt>>;
    // 全局提示词加上指定课程的提示词
    async fn list_prompts(&self, class_ids: &[i64]) -> Result<Vec<GradingPrompt>>;
    async fn update_prompt(
        &self,
        prompt_id: i64,
        title: &str,
        prompt: &str,
    ) -> Result<Option<GradingPrompt>>;
    // 不存在相同内容的系统全局提示词时写入，返回是否写入
    async fn seed_global_prompt(&self, title: &str, prompt: &str) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
