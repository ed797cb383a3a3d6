use serde::{Deserialize, Serialize};

// 课程成员角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClassUserRole {
    Student,   // 选课学生
    Professor, // 授课教授（课程所有者）
}

impl ClassUserRole {
    pub const STUDENT: &'static str = "student";
    pub const PROFESSOR: &'static str = "professor";
}

impl<'de> Deserialize<'de> for ClassUserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<ClassUserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的课程成员角色: '{s}'. 支持的角色: student, professor"
            ))
        })
    }
}

impl std::fmt::Display for ClassUserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassUserRole::Student => write!(f, "{}", ClassUserRole::STUDENT),
            ClassUserRole::Professor => write!(f, "{}", ClassUserRole::PROFESSOR),
        }
    }
}

impl std::str::FromStr for ClassUserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ClassUserRole::STUDENT => Ok(ClassUserRole::Student),
            ClassUserRole::PROFESSOR => Ok(ClassUserRole::Professor),
            _ => Err(format!("Invalid class user role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassUser {
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub role: ClassUserRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

impl ClassUser {
    pub fn is_professor(&self) -> bool {
        self.role == ClassUserRole::Professor
    }
}
