use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::{assignments, prompts};
use crate::middlewares::{self, RequireClassRole};
use crate::models::class_users::entities::ClassUserRole;
use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest};
use crate::models::users::entities::UserRole;
use crate::services::ClassService;
use crate::utils::{SafeClassIdI64, SafeUserIdI64};

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn get_class(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req, class_id.0).await
}

pub async fn enroll(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.enroll(&req, class_id.0).await
}

pub async fn add_professor(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    user_id: SafeUserIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.add_professor(&req, class_id.0, user_id.0).await
}

pub async fn list_class_submissions(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_class_submissions(&req, class_id.0).await
}

pub async fn get_class_stats(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class_stats(&req, class_id.0).await
}

// 配置路由
//
// 课程下的作业与提示词也挂在这个 scope 内
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                // 教授看自己的课程，学生看全部课程
                web::resource("").route(web::get().to(list_classes)).route(
                    web::post()
                        .to(create_class)
                        .wrap(middlewares::RequireRole::new(&UserRole::Professor)),
                ),
            )
            .service(
                web::resource("/{class_id}")
                    .wrap(RequireClassRole::member())
                    .route(web::get().to(get_class)),
            )
            .service(
                web::resource("/{class_id}/enroll").route(
                    web::post()
                        .to(enroll)
                        .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                ),
            )
            .service(
                web::resource("/{class_id}/professors/{user_id}")
                    .wrap(RequireClassRole::new(&ClassUserRole::Professor))
                    .route(web::post().to(add_professor)),
            )
            .service(
                web::resource("/{class_id}/submissions")
                    .wrap(RequireClassRole::member())
                    .route(web::get().to(list_class_submissions)),
            )
            .service(
                web::resource("/{class_id}/stats")
                    .wrap(RequireClassRole::new(&ClassUserRole::Professor))
                    .route(web::get().to(get_class_stats)),
            )
            .service(
                web::resource("/{class_id}/assignments")
                    .route(
                        web::get()
                            .to(assignments::list_assignments)
                            .wrap(RequireClassRole::member()),
                    )
                    .route(
                        web::post()
                            .to(assignments::create_assignment)
                            .wrap(RequireClassRole::new(&ClassUserRole::Professor)),
                    ),
            )
            .service(
                web::resource("/{class_id}/prompt")
                    .route(
                        web::get()
                            .to(prompts::get_class_prompt)
                            .wrap(RequireClassRole::member()),
                    )
                    .route(
                        web::post()
                            .to(prompts::assign_class_prompt)
                            .wrap(RequireClassRole::new(&ClassUserRole::Professor)),
                    )
                    .route(
                        web::put()
                            .to(prompts::update_class_prompt)
                            .wrap(RequireClassRole::new(&ClassUserRole::Professor)),
                    ),
            ),
    );
}
