use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::submissions::requests::{
    CreateSubmissionRequest, ProfessorGradeRequest, SubmissionListParams,
};
use crate::models::users::entities::UserRole;
use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SUBMISSION_SERVICE 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn create_submission(
    req: HttpRequest,
    submission: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .create_submission(&req, submission.into_inner())
        .await
}

pub async fn upload_submission(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.upload_submission(&req, payload).await
}

pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, query.into_inner())
        .await
}

pub async fn get_submission(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_submission(&req, id.0).await
}

pub async fn professor_grade(
    req: HttpRequest,
    id: SafeIDI64,
    grade: web::Json<ProfessorGradeRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .professor_grade(&req, id.0, grade.into_inner())
        .await
}

pub async fn regrade(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.regrade(&req, id.0).await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_submissions))
                    .route(
                        web::post()
                            .to(create_submission)
                            .wrap(RateLimit::grading())
                            .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                    ),
            )
            .service(
                web::resource("/upload").route(
                    web::post()
                        .to(upload_submission)
                        .wrap(RateLimit::grading())
                        .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                ),
            )
            .service(web::resource("/{id}").route(web::get().to(get_submission)))
            .service(
                web::resource("/{id}/professor-grade").route(
                    web::post()
                        .to(professor_grade)
                        .wrap(middlewares::RequireRole::new(&UserRole::Professor)),
                ),
            )
            .service(
                web::resource("/{id}/regrade").route(
                    web::post()
                        .to(regrade)
                        .wrap(RateLimit::grading())
                        .wrap(middlewares::RequireRole::new(&UserRole::Professor)),
                ),
            ),
    );
}
