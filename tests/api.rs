//! 端到端接口测试：临时 SQLite + wiremock 模拟的 AI 接口

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rust_aigrader::cache::create_object_cache;
use rust_aigrader::config::{AiConfig, DatabaseConfig};
use rust_aigrader::grading::{DEFAULT_PROMPT_TEMPLATE, GradingService};
use rust_aigrader::middlewares::RateLimitStore;
use rust_aigrader::models::assignments::entities::Assignment;
use rust_aigrader::models::assignments::requests::CreateAssignmentRequest;
use rust_aigrader::models::class_users::entities::ClassUserRole;
use rust_aigrader::models::classes::entities::Class;
use rust_aigrader::models::classes::requests::CreateClassRequest;
use rust_aigrader::models::users::entities::{User, UserRole};
use rust_aigrader::models::users::requests::CreateUserRequest;
use rust_aigrader::runtime::lifetime::startup::StartupContext;
use rust_aigrader::storage::Storage;
use rust_aigrader::storage::sea_orm_storage::SeaOrmStorage;
use rust_aigrader::utils::jwt::JwtUtils;
use rust_aigrader::utils::password::hash_password;

struct Fixture {
    _dir: TempDir,
    ctx: StartupContext,
    professor: User,
    student: User,
    class: Class,
    assignment: Assignment,
}

fn ai_config(endpoint: &str) -> AiConfig {
    AiConfig {
        endpoint: endpoint.to_string(),
        api_key: "test-key".to_string(),
        request_timeout_secs: 1,
        ..AiConfig::default()
    }
}

fn completion(content: &str) -> Value {
    json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

async fn create_user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "unused-in-tests".to_string(),
            role,
            display_name: None,
        })
        .await
        .unwrap()
}

fn bearer(user: &User) -> (&'static str, String) {
    let pair = JwtUtils::generate_token_pair(user.id, &user.role.to_string(), None).unwrap();
    ("Authorization", format!("Bearer {}", pair.access_token))
}

async fn setup(ai: AiConfig) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}/test.db?mode=rwc", dir.path().display());
    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::connect(&url, &DatabaseConfig::default())
            .await
            .unwrap(),
    );

    let professor = create_user(&storage, "prof_ada", UserRole::Professor).await;
    let student = create_user(&storage, "student_bob", UserRole::Student).await;

    let class = storage
        .create_class(
            professor.id,
            CreateClassRequest {
                name: "Intro to Python".to_string(),
                code: Some("PY101".to_string()),
                description: None,
                prerequisites: None,
                learning_objectives: None,
            },
        )
        .await
        .unwrap();
    storage
        .join_class(student.id, class.id, ClassUserRole::Student)
        .await
        .unwrap();

    let assignment = storage
        .create_assignment(
            class.id,
            professor.id,
            CreateAssignmentRequest {
                name: "Reverse a list".to_string(),
                description: Some("Return the list reversed.".to_string()),
            },
        )
        .await
        .unwrap();

    let ctx = StartupContext {
        storage,
        cache: create_object_cache(),
        grading: Arc::new(GradingService::new(&ai).unwrap()),
        rate_limits: RateLimitStore::new(),
    };

    Fixture {
        _dir: dir,
        ctx,
        professor,
        student,
        class,
        assignment,
    }
}

#[actix_web::test]
async fn test_submission_is_graded_by_ai() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "```json\n{\"grade\": 88, \"feedback\": {\"code_quality\": \"Clean\", \"bugs\": []}}\n```",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fx = setup(ai_config(&mock_server.uri())).await;
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/submissions")
        .insert_header(bearer(&fx.student))
        .set_json(json!({"assignment_id": fx.assignment.id, "code": "def rev(xs):\n    return xs[::-1]\n"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(data["grading_status"], "graded");
    assert_eq!(data["ai_grade"], 88.0);
    assert_eq!(data["final_grade"], 88.0);
    assert_eq!(data["needs_manual_review"], false);
    assert!(
        data["ai_feedback"]
            .as_str()
            .unwrap()
            .starts_with("Code Quality Assessment:\nClean")
    );
}

#[actix_web::test]
async fn test_ai_timeout_still_creates_submission() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("{\"grade\": 90, \"feedback\": \"late\"}"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let fx = setup(ai_config(&mock_server.uri())).await;
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/submissions")
        .insert_header(bearer(&fx.student))
        .set_json(json!({"assignment_id": fx.assignment.id, "code": "print('hi')"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(data["grading_status"], "failed");
    assert!(data["ai_grade"].is_null());
    assert!(data["ai_feedback"].is_null());
    assert_eq!(data["needs_manual_review"], true);

    let stored = fx
        .ctx
        .storage
        .get_submission_by_id(data["id"].as_i64().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.code, "print('hi')");
    assert!(stored.ai_grade.is_none());
}

#[actix_web::test]
async fn test_malformed_ai_output_falls_back_to_manual_review() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("I would give this a solid B, nice work!")),
        )
        .mount(&mock_server)
        .await;

    let fx = setup(ai_config(&mock_server.uri())).await;
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/submissions")
        .insert_header(bearer(&fx.student))
        .set_json(json!({"assignment_id": fx.assignment.id, "code": "x = 1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["grading_status"], "failed");
    assert!(body["data"]["ai_grade"].is_null());
    assert!(body["data"]["grading_error"].as_str().is_some());
}

#[actix_web::test]
async fn test_code_is_stored_byte_for_byte() {
    let fx = setup(AiConfig::default()).await;
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let code = "def f():\r\n\tprint(\"héllo 世界\")  \r\n\n    return {'a': 1}\n";
    let req = test::TestRequest::post()
        .uri("/api/v1/submissions")
        .insert_header(bearer(&fx.student))
        .set_json(json!({"assignment_id": fx.assignment.id, "code": code}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/submissions/{id}"))
        .insert_header(bearer(&fx.professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["code"], code);
}

#[actix_web::test]
async fn test_assignment_with_submissions_cannot_be_deleted() {
    let fx = setup(AiConfig::default()).await;
    fx.ctx
        .storage
        .create_submission(fx.student.id, fx.class.id, fx.assignment.id, "pass")
        .await
        .unwrap();
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/assignments/{}", fx.assignment.id))
        .insert_header(bearer(&fx.professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4001);

    // 作业与提交都未被改动
    let storage = &fx.ctx.storage;
    assert!(
        storage
            .get_assignment_by_id(fx.assignment.id)
            .await
            .unwrap()
            .is_some()
    );
    assert_eq!(
        storage.list_class_submissions(fx.class.id).await.unwrap().len(),
        1
    );
}

#[actix_web::test]
async fn test_non_owner_professor_cannot_edit_assignment() {
    let fx = setup(AiConfig::default()).await;
    let outsider = create_user(&fx.ctx.storage, "prof_eve", UserRole::Professor).await;
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/assignments/{}", fx.assignment.id))
        .insert_header(bearer(&outsider))
        .set_json(json!({"name": "Hijacked", "description": "changed"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3003);

    let unchanged = fx
        .ctx
        .storage
        .get_assignment_by_id(fx.assignment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.name, "Reverse a list");
    assert_eq!(unchanged.description, "Return the list reversed.");
}

#[actix_web::test]
async fn test_create_assignment_reports_field_errors() {
    let fx = setup(AiConfig::default()).await;
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/classes/{}/assignments", fx.class.id))
        .insert_header(bearer(&fx.professor))
        .set_json(json!({"name": "   ", "description": "whatever"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1006);
    assert_eq!(body["data"][0]["field"], "name");
}

#[actix_web::test]
async fn test_student_outside_class_cannot_submit() {
    let fx = setup(AiConfig::default()).await;
    let stranger = create_user(&fx.ctx.storage, "student_carl", UserRole::Student).await;
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/submissions")
        .insert_header(bearer(&stranger))
        .set_json(json!({"assignment_id": fx.assignment.id, "code": "pass"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(
        fx.ctx
            .storage
            .list_class_submissions(fx.class.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[actix_web::test]
async fn test_professor_grade_overrides_ai_grade() {
    let fx = setup(AiConfig::default()).await;
    let submission = fx
        .ctx
        .storage
        .create_submission(fx.student.id, fx.class.id, fx.assignment.id, "pass")
        .await
        .unwrap();
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/submissions/{}/professor-grade", submission.id))
        .insert_header(bearer(&fx.professor))
        .set_json(json!({"grade": 75, "feedback": "Needs tests"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = fx
        .ctx
        .storage
        .get_submission_by_id(submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.professor_grade, Some(75.0));
    assert_eq!(stored.final_grade, Some(75.0));
    assert!(!stored.needs_manual_review);
}

#[actix_web::test]
async fn test_regrade_uses_current_assignment_description() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("UPDATED DESCRIPTION XYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "{\"grade\": 91, \"feedback\": \"Matches the new requirements\"}",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fx = setup(ai_config(&mock_server.uri())).await;
    let submission = fx
        .ctx
        .storage
        .create_submission(fx.student.id, fx.class.id, fx.assignment.id, "xs.reverse()")
        .await
        .unwrap();
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/assignments/{}", fx.assignment.id))
        .insert_header(bearer(&fx.professor))
        .set_json(json!({"description": "UPDATED DESCRIPTION XYZ"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/submissions/{}/regrade", submission.id))
        .insert_header(bearer(&fx.professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["grading_status"], "graded");
    assert_eq!(body["data"]["ai_grade"], 91.0);
    assert_eq!(body["data"]["needs_manual_review"], false);

    // 学生不能触发重新评分
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/submissions/{}/regrade", submission.id))
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_outside_professor_prompt_does_not_change_class_grading() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("LENIENT TEMPLATE"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("{\"grade\": 0, \"feedback\": \"lenient\"}")),
        )
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "{\"grade\": 72, \"feedback\": \"Works for the sample input\"}",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fx = setup(ai_config(&mock_server.uri())).await;
    let outsider = create_user(&fx.ctx.storage, "prof_eve", UserRole::Professor).await;
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/prompts")
        .insert_header(bearer(&outsider))
        .set_json(json!({"title": "Mine", "prompt": "LENIENT TEMPLATE {description} {code}"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/grading/effective-prompt?class_id={}", fx.class.id))
        .insert_header(bearer(&fx.professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["source"], "default");

    let req = test::TestRequest::post()
        .uri("/api/v1/submissions")
        .insert_header(bearer(&fx.student))
        .set_json(json!({"assignment_id": fx.assignment.id, "code": "print(sorted(xs))"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["ai_grade"], 72.0);
}

const BOUNDARY: &str = "----aigrader-test-boundary";

fn multipart_body(assignment_id: i64, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"assignment_id\"\r\n\r\n{assignment_id}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(user: &User, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/submissions/upload")
        .insert_header(bearer(user))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

#[actix_web::test]
async fn test_upload_checks_extension_encoding_and_size() {
    let fx = setup(AiConfig::default()).await;
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let body = multipart_body(fx.assignment.id, "notes.txt", b"print(1)");
    let req = upload_request(&fx.student, body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 5002);

    let body = multipart_body(fx.assignment.id, "latin1.py", &[0x70, 0xe9, 0xff, 0xfe, 0x0a]);
    let req = upload_request(&fx.student, body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1006);
    assert_eq!(body["data"][0]["field"], "code");

    let oversized = vec![b'a'; 80_001];
    let body = multipart_body(fx.assignment.id, "big.py", &oversized);
    let req = upload_request(&fx.student, body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["field"], "code");

    assert!(
        fx.ctx
            .storage
            .list_class_submissions(fx.class.id)
            .await
            .unwrap()
            .is_empty()
    );

    let code = "def rev(xs):\n    return xs[::-1]\n";
    let body = multipart_body(fx.assignment.id, "Solution.PY", code.as_bytes());
    let req = upload_request(&fx.student, body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["code"], code);
}

#[actix_web::test]
async fn test_prompt_library_routes() {
    let fx = setup(AiConfig::default()).await;
    let outsider = create_user(&fx.ctx.storage, "prof_eve", UserRole::Professor).await;
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/grading/sample-prompt")
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["prompt"], DEFAULT_PROMPT_TEMPLATE);
    assert_eq!(body["data"]["source"], "default");

    let req = test::TestRequest::post()
        .uri("/api/v1/prompts")
        .insert_header(bearer(&fx.professor))
        .set_json(json!({
            "title": "Rubric",
            "prompt": "Grade carefully. {description} {code}",
            "class_id": fx.class.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["class_id"], fx.class.id);
    assert_eq!(body["data"]["created_by"], fx.professor.id);
    assert!(body["data"]["missing_placeholders"].as_array().unwrap().is_empty());

    // 缺少占位符仍可保存，但会返回提示
    let req = test::TestRequest::post()
        .uri("/api/v1/prompts")
        .insert_header(bearer(&fx.professor))
        .set_json(json!({"title": "Loose", "prompt": "Just grade it.", "class_id": fx.class.id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["missing_placeholders"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::post()
        .uri("/api/v1/prompts")
        .insert_header(bearer(&fx.professor))
        .set_json(json!({"title": "  ", "prompt": "{description} {code}"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1006);

    let req = test::TestRequest::post()
        .uri("/api/v1/prompts")
        .insert_header(bearer(&outsider))
        .set_json(json!({"title": "Mine", "prompt": "{description} {code}", "class_id": fx.class.id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/v1/prompts")
        .insert_header(bearer(&fx.student))
        .set_json(json!({"title": "Mine", "prompt": "{description} {code}"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/prompts?class_id={}", fx.class.id))
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["title"].as_str())
        .collect();
    assert!(titles.contains(&"Rubric"));
    assert!(titles.contains(&"Loose"));

    // 非课程成员不能按课程查看
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/prompts?class_id={}", fx.class.id))
        .insert_header(bearer(&outsider))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_class_prompt_assign_and_update() {
    let fx = setup(AiConfig::default()).await;
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;
    let class_prompt_uri = format!("/api/v1/classes/{}/prompt", fx.class.id);

    let req = test::TestRequest::get()
        .uri(&class_prompt_uri)
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 6000);

    let req = test::TestRequest::post()
        .uri("/api/v1/prompts")
        .insert_header(bearer(&fx.professor))
        .set_json(json!({"title": "Shared rubric", "prompt": "Shared. {description} {code}"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let library_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&class_prompt_uri)
        .insert_header(bearer(&fx.professor))
        .set_json(json!({"prompt_id": library_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["class_id"], fx.class.id);
    assert_eq!(body["data"]["prompt"], "Shared. {description} {code}");
    assert_ne!(body["data"]["id"].as_i64().unwrap(), library_id);

    let req = test::TestRequest::get()
        .uri(&class_prompt_uri)
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "Shared rubric");

    let req = test::TestRequest::put()
        .uri(&class_prompt_uri)
        .insert_header(bearer(&fx.student))
        .set_json(json!({"title": "Mine", "prompt": "{description} {code}"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&class_prompt_uri)
        .insert_header(bearer(&fx.professor))
        .set_json(json!({"title": "Edited", "prompt": "Edited. {description} {code}"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/grading/effective-prompt?class_id={}", fx.class.id))
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["source"], "class");
    assert_eq!(body["data"]["prompt"], "Edited. {description} {code}");
}

#[actix_web::test]
async fn test_enroll_add_professor_and_stats() {
    let fx = setup(AiConfig::default()).await;
    let newcomer = create_user(&fx.ctx.storage, "student_dan", UserRole::Student).await;
    let co_teacher = create_user(&fx.ctx.storage, "prof_eve", UserRole::Professor).await;
    fx.ctx
        .storage
        .create_submission(fx.student.id, fx.class.id, fx.assignment.id, "pass")
        .await
        .unwrap();
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let enroll_uri = format!("/api/v1/classes/{}/enroll", fx.class.id);
    let req = test::TestRequest::post()
        .uri(&enroll_uri)
        .insert_header(bearer(&newcomer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["role"], "student");

    let req = test::TestRequest::post()
        .uri(&enroll_uri)
        .insert_header(bearer(&newcomer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3004);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/classes/{}/professors/{}", fx.class.id, newcomer.id))
        .insert_header(bearer(&fx.professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2009);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/classes/{}/professors/{}", fx.class.id, co_teacher.id))
        .insert_header(bearer(&fx.professor))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // 新加入的教授可以查看统计
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/classes/{}/stats", fx.class.id))
        .insert_header(bearer(&co_teacher))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["student_count"], 2);
    let assignments = body["data"]["assignments"].as_array().unwrap();
    assert_eq!(assignments.len(), 3);
    let reverse = assignments
        .iter()
        .find(|a| a["assignment_id"] == fx.assignment.id)
        .unwrap();
    assert_eq!(reverse["submission_count"], 1);
    assert_eq!(reverse["needs_review_count"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/classes/{}/stats", fx.class.id))
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_register_reports_field_errors_and_conflicts() {
    let fx = setup(AiConfig::default()).await;
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "username": "ab",
            "email": "not-an-email",
            "password": "short",
            "role": "student"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1006);
    let fields: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["username", "email", "password"]);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "username": "grace_h",
            "email": "grace@example.com",
            "password": "Cobol1959x",
            "role": "professor",
            "display_name": "  Grace  "
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["username"], "grace_h");
    assert_eq!(body["data"]["role"], "professor");
    assert_eq!(body["data"]["display_name"], "Grace");
    assert!(body["data"].get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "username": "grace_h",
            "email": "other@example.com",
            "password": "Cobol1959x",
            "role": "student"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2006);
}

#[actix_web::test]
async fn test_login_and_password_change() {
    let fx = setup(AiConfig::default()).await;
    let hopper = fx
        .ctx
        .storage
        .create_user(CreateUserRequest {
            username: "hopper".to_string(),
            email: "hopper@example.com".to_string(),
            password_hash: hash_password("Compiler1952").unwrap(),
            role: UserRole::Professor,
            display_name: None,
        })
        .await
        .unwrap();
    let app = test::init_service(App::new().configure(|cfg| fx.ctx.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"username": "hopper@example.com", "password": "Wrong1234x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2000);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"username": "hopper", "password": "Compiler1952"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.response()
            .cookies()
            .any(|c| c.name() == "refresh_token" && !c.value().is_empty())
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["id"], hopper.id);
    let access_token = body["data"]["access_token"].as_str().unwrap().to_string();
    let auth = ("Authorization", format!("Bearer {access_token}"));

    let req = test::TestRequest::put()
        .uri("/api/v1/auth/password")
        .insert_header(auth.clone())
        .set_json(json!({"current_password": "NotMine1234", "new_password": "Grace1906abc"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::put()
        .uri("/api/v1/auth/password")
        .insert_header(auth.clone())
        .set_json(json!({"current_password": "Compiler1952", "new_password": "weak"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["field"], "new_password");

    let req = test::TestRequest::put()
        .uri("/api/v1/auth/password")
        .insert_header(auth)
        .set_json(json!({"current_password": "Compiler1952", "new_password": "Grace1906abc"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"username": "hopper", "password": "Grace1906abc"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
