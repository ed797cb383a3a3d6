use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::models::users::entities::UserRole;
use crate::services::AssignmentService;
use crate::utils::{SafeClassIdI64, SafeIDI64};

// 懒加载的全局 ASSIGNMENT_SERVICE 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

// 以下两个处理程序挂在 /api/v1/classes/{class_id}/assignments
pub async fn list_assignments(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(&req, class_id.0).await
}

pub async fn create_assignment(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    assignment: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, class_id.0, assignment.into_inner())
        .await
}

pub async fn get_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(&req, id.0).await
}

pub async fn update_assignment(
    req: HttpRequest,
    id: SafeIDI64,
    update: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, id.0, update.into_inner())
        .await
}

pub async fn delete_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.delete_assignment(&req, id.0).await
}

pub async fn list_assignment_submissions(
    req: HttpRequest,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignment_submissions(&req, id.0)
        .await
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_assignment))
                    .route(
                        web::put()
                            .to(update_assignment)
                            .wrap(middlewares::RequireRole::new(&UserRole::Professor)),
                    )
                    .route(
                        web::delete()
                            .to(delete_assignment)
                            .wrap(middlewares::RequireRole::new(&UserRole::Professor)),
                    ),
            )
            .service(
                web::resource("/{id}/submissions").route(
                    web::get()
                        .to(list_assignment_submissions)
                        .wrap(middlewares::RequireRole::new(&UserRole::Professor)),
                ),
            ),
    );
}
