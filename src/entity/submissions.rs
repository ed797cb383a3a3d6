//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub class_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text")]
    pub code: String,
    pub ai_grade: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ai_feedback: Option<String>,
    pub grading_status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub grading_error: Option<String>,
    pub professor_grade: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub professor_feedback: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use super::timestamp_to_datetime;
        use crate::models::submissions::entities::{GradingStatus, Submission};

        let grading_status = self
            .grading_status
            .parse::<GradingStatus>()
            .unwrap_or(GradingStatus::Pending);

        Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            class_id: self.class_id,
            student_id: self.student_id,
            final_grade: Submission::compute_final_grade(self.ai_grade, self.professor_grade),
            needs_manual_review: Submission::compute_needs_manual_review(
                grading_status,
                self.professor_grade,
            ),
            code: self.code,
            ai_grade: self.ai_grade,
            ai_feedback: self.ai_feedback,
            grading_status,
            grading_error: self.grading_error,
            professor_grade: self.professor_grade,
            professor_feedback: self.professor_feedback,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}
