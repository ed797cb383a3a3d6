//! 存储层与模板选择测试

use std::sync::Arc;

use tempfile::TempDir;

use rust_aigrader::config::DatabaseConfig;
use rust_aigrader::grading::{DEFAULT_PROMPT_TEMPLATE, DEFAULT_PROMPT_TITLE, GradingService};
use rust_aigrader::models::assignments::entities::AssignmentDeletion;
use rust_aigrader::models::assignments::requests::CreateAssignmentRequest;
use rust_aigrader::models::class_users::entities::ClassUserRole;
use rust_aigrader::models::classes::requests::CreateClassRequest;
use rust_aigrader::models::prompts::requests::NewGradingPrompt;
use rust_aigrader::models::prompts::responses::TemplateSource;
use rust_aigrader::models::submissions::entities::GradingStatus;
use rust_aigrader::models::submissions::requests::GradingUpdate;
use rust_aigrader::models::users::entities::{User, UserRole};
use rust_aigrader::models::users::requests::CreateUserRequest;
use rust_aigrader::storage::Storage;
use rust_aigrader::storage::sea_orm_storage::SeaOrmStorage;

async fn open_storage() -> (TempDir, Arc<dyn Storage>) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}/storage.db?mode=rwc", dir.path().display());
    let storage = SeaOrmStorage::connect(&url, &DatabaseConfig::default())
        .await
        .unwrap();
    (dir, Arc::new(storage))
}

async fn user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "x".to_string(),
            role,
            display_name: Some(username.to_uppercase()),
        })
        .await
        .unwrap()
}

fn class_request(code: &str) -> CreateClassRequest {
    CreateClassRequest {
        name: format!("Class {code}"),
        code: Some(code.to_string()),
        description: None,
        prerequisites: None,
        learning_objectives: None,
    }
}

#[tokio::test]
async fn test_create_class_registers_owner_and_default_assignment() {
    let (_dir, storage) = open_storage().await;
    let prof = user(&storage, "prof", UserRole::Professor).await;

    let class = storage.create_class(prof.id, class_request("CS50")).await.unwrap();

    let membership = storage.get_class_user(class.id, prof.id).await.unwrap().unwrap();
    assert_eq!(membership.role, ClassUserRole::Professor);
    let names: Vec<String> = storage
        .list_class_assignments(class.id)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Assignment 1".to_string()));
    assert!(names.contains(&"Assignment 2".to_string()));
    assert!(storage.get_class_by_code("CS50").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_assignment_without_submissions() {
    let (_dir, storage) = open_storage().await;
    let prof = user(&storage, "prof", UserRole::Professor).await;
    let class = storage.create_class(prof.id, class_request("CS51")).await.unwrap();
    let assignment = storage
        .create_assignment(
            class.id,
            prof.id,
            CreateAssignmentRequest {
                name: "Scratch".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(
        storage.delete_assignment(assignment.id).await.unwrap(),
        AssignmentDeletion::Deleted
    );
    assert_eq!(
        storage.delete_assignment(assignment.id).await.unwrap(),
        AssignmentDeletion::NotFound
    );
}

#[tokio::test]
async fn test_delete_assignment_with_submissions_is_refused() {
    let (_dir, storage) = open_storage().await;
    let prof = user(&storage, "prof", UserRole::Professor).await;
    let student = user(&storage, "stu", UserRole::Student).await;
    let class = storage.create_class(prof.id, class_request("CS52")).await.unwrap();
    storage
        .join_class(student.id, class.id, ClassUserRole::Student)
        .await
        .unwrap();
    let assignment = storage.list_class_assignments(class.id).await.unwrap()[0].clone();

    storage
        .create_submission(student.id, class.id, assignment.id, "a = 1")
        .await
        .unwrap();
    storage
        .create_submission(student.id, class.id, assignment.id, "a = 2")
        .await
        .unwrap();

    assert_eq!(
        storage.delete_assignment(assignment.id).await.unwrap(),
        AssignmentDeletion::HasSubmissions(2)
    );
    assert!(storage.get_assignment_by_id(assignment.id).await.unwrap().is_some());

    let groups = storage
        .list_assignment_submissions_by_student(assignment.id)
        .await
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].user_id, student.id);
    assert_eq!(groups[0].submission_count, 2);
}

#[tokio::test]
async fn test_grading_updates_and_final_grade() {
    let (_dir, storage) = open_storage().await;
    let prof = user(&storage, "prof", UserRole::Professor).await;
    let student = user(&storage, "stu", UserRole::Student).await;
    let class = storage.create_class(prof.id, class_request("CS53")).await.unwrap();
    let assignment = storage.list_class_assignments(class.id).await.unwrap()[0].clone();

    let pending = storage
        .create_submission(student.id, class.id, assignment.id, "print(1)")
        .await
        .unwrap();
    assert_eq!(pending.grading_status, GradingStatus::Pending);
    assert!(pending.final_grade.is_none());
    // 评分结果没有写回的提交也要进入人工评分
    assert!(pending.needs_manual_review);

    let failed = storage
        .apply_grading_update(
            pending.id,
            GradingUpdate::Failed {
                error: "AI request timed out".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(failed.grading_status, GradingStatus::Failed);
    assert!(failed.ai_grade.is_none());
    assert!(failed.needs_manual_review);

    let graded = storage
        .apply_grading_update(
            pending.id,
            GradingUpdate::Graded {
                grade: 64.5,
                feedback: "ok".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(graded.final_grade, Some(64.5));
    assert!(graded.grading_error.is_none());

    let overridden = storage
        .set_professor_grade(pending.id, 80.0, Some("Better than it looks".to_string()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(overridden.ai_grade, Some(64.5));
    assert_eq!(overridden.final_grade, Some(80.0));
}

#[tokio::test]
async fn test_template_resolution_order() {
    let (_dir, storage) = open_storage().await;
    let prof = user(&storage, "prof", UserRole::Professor).await;
    let class = storage.create_class(prof.id, class_request("CS54")).await.unwrap();

    let template = GradingService::resolve_template(&storage, class.id).await.unwrap();
    assert_eq!(template.source, TemplateSource::Default);
    assert_eq!(template.prompt, DEFAULT_PROMPT_TEMPLATE);

    // 教授创建的无课程提示词不参与其他课程的模板选择
    let outsider = user(&storage, "outsider", UserRole::Professor).await;
    storage
        .create_prompt(NewGradingPrompt {
            title: "Lenient".to_string(),
            prompt: "Give everyone 100. {description} {code}".to_string(),
            class_id: None,
            created_by: Some(outsider.id),
        })
        .await
        .unwrap();
    let template = GradingService::resolve_template(&storage, class.id).await.unwrap();
    assert_eq!(template.source, TemplateSource::Default);

    assert!(
        storage
            .seed_global_prompt(DEFAULT_PROMPT_TITLE, DEFAULT_PROMPT_TEMPLATE)
            .await
            .unwrap()
    );
    assert!(
        !storage
            .seed_global_prompt(DEFAULT_PROMPT_TITLE, DEFAULT_PROMPT_TEMPLATE)
            .await
            .unwrap()
    );
    let template = GradingService::resolve_template(&storage, class.id).await.unwrap();
    assert_eq!(template.source, TemplateSource::Global);

    let class_prompt = storage
        .create_prompt(NewGradingPrompt {
            title: "Strict".to_string(),
            prompt: "Be strict. {description} {code}".to_string(),
            class_id: Some(class.id),
            created_by: Some(prof.id),
        })
        .await
        .unwrap();
    let template = GradingService::resolve_template(&storage, class.id).await.unwrap();
    assert_eq!(template.source, TemplateSource::Class);
    assert_eq!(template.prompt_id, Some(class_prompt.id));

    let edited = storage
        .update_prompt(class_prompt.id, "Stricter", "Be stricter. {description} {code}")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.title, "Stricter");
    let template = GradingService::resolve_template(&storage, class.id).await.unwrap();
    assert_eq!(template.prompt, "Be stricter. {description} {code}");

    // 其他课程仍使用全局模板
    let other = storage.create_class(prof.id, class_request("CS55")).await.unwrap();
    let template = GradingService::resolve_template(&storage, other.id).await.unwrap();
    assert_eq!(template.source, TemplateSource::Global);
}
