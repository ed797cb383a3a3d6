use serde::Serialize;

use crate::models::class_users::entities::ClassUserRole;

/// 选课 / 添加教授后的成员信息
#[derive(Debug, Serialize)]
pub struct ClassMembershipResponse {
    pub class_id: i64,
    pub user_id: i64,
    pub role: ClassUserRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}
