/*!
 * 基于课程身份的访问控制中间件
 *
 * 此中间件必须在 RequireJWT 中间件之后使用，路由中需要包含 `{class_id}`。
 * 通过后把当前用户的 `ClassUser` 放入请求扩展。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use crate::middlewares::{RequireJWT, RequireClassRole};
 * use crate::models::class_users::entities::ClassUserRole;
 *
 * web::scope("/api/v1/classes")
 *     .wrap(RequireJWT)
 *     .service(
 *         web::resource("/{class_id}/stats")
 *             .wrap(RequireClassRole::new(&ClassUserRole::Professor)) // 仅课程教授
 *             .route(web::get().to(class_stats)),
 *     )
 * ```
 *
 * 课程成员（教授或已选课学生）均可访问：
 *
 * ```rust,ignore
 * .wrap(RequireClassRole::member())
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};

use crate::{
    models::{
        ErrorCode,
        class_users::entities::{ClassUser, ClassUserRole},
        users::entities::User,
    },
    storage::Storage,
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireClassRole {
    required_roles: Vec<ClassUserRole>,
}

impl RequireClassRole {
    /// 创建需要特定课程身份的中间件
    pub fn new(role: &ClassUserRole) -> Self {
        Self {
            required_roles: vec![role.clone()],
        }
    }

    /// 课程的任意成员
    pub fn member() -> Self {
        Self {
            required_roles: vec![ClassUserRole::Professor, ClassUserRole::Student],
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireClassRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireClassRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireClassRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireClassRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<ClassUserRole>,
}

/// 成员查询结果
enum Membership {
    Member(ClassUser),
    NotMember,
    ClassNotFound,
    StorageError,
}

impl<S, B> Service<ServiceRequest> for RequireClassRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required_roles = self.required_roles.clone();

        Box::pin(async move {
            // 1. 校验用户信息
            let user_id_opt = req.extensions().get::<User>().map(|u| u.id);
            let user_id = match user_id_opt {
                Some(id) => id,
                None => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Unauthorized: missing user claims",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            // 2. 校验 class_id
            let class_id = match req
                .match_info()
                .get("class_id")
                .and_then(|s| s.parse::<i64>().ok())
            {
                Some(cid) => cid,
                None => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::BAD_REQUEST,
                            ErrorCode::BadRequest,
                            "Missing or invalid class_id",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            // 3. 查询用户在课程中的身份
            let class_user = match lookup_membership(&req, user_id, class_id).await {
                Membership::Member(cu) => cu,
                Membership::ClassNotFound => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::NOT_FOUND,
                            ErrorCode::ClassNotFound,
                            "Class not found",
                        )
                        .map_into_right_body(),
                    ));
                }
                Membership::NotMember => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::ClassPermissionDenied,
                            "You are not a member of this class",
                        )
                        .map_into_right_body(),
                    ));
                }
                Membership::StorageError => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Failed to check class membership",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            // 4. 判断是否拥有所需身份
            if required_roles.iter().any(|role| &class_user.role == role) {
                tracing::debug!(
                    "Class user {} has permission for class {}",
                    class_user.user_id,
                    class_id
                );
                req.extensions_mut().insert(class_user);
                let res = srv.call(req).await?.map_into_left_body();
                Ok(res)
            } else {
                Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::ClassPermissionDenied,
                        "Access denied for this class role",
                    )
                    .map_into_right_body(),
                ))
            }
        })
    }
}

// 辅助函数：从请求中提取课程身份
impl RequireClassRole {
    /// 从请求扩展中提取当前用户的 ClassUser
    /// 此函数应该在应用了RequireClassRole中间件的路由处理程序中使用
    pub fn extract_class_user(req: &actix_web::HttpRequest) -> Option<ClassUser> {
        req.extensions().get::<ClassUser>().cloned()
    }
}

async fn lookup_membership(req: &ServiceRequest, user_id: i64, class_id: i64) -> Membership {
    let Some(storage) = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|d| d.get_ref().clone())
    else {
        tracing::error!("Storage not found in app data");
        return Membership::StorageError;
    };

    match storage.get_class_user(class_id, user_id).await {
        Ok(Some(class_user)) => Membership::Member(class_user),
        Ok(None) => match storage.get_class_by_id(class_id).await {
            Ok(Some(_)) => Membership::NotMember,
            Ok(None) => Membership::ClassNotFound,
            Err(e) => {
                tracing::error!("Failed to query class {}: {}", class_id, e);
                Membership::StorageError
            }
        },
        Err(e) => {
            tracing::error!("Failed to query class membership: {}", e);
            Membership::StorageError
        }
    }
}
