/*!
 * 全局角色校验中间件
 *
 * 每个账号只有一个角色（教授或学生），用于限制只允许某一类账号调用的接口，
 * 例如只有教授能创建课程、只有学生能提交代码。需挂在 RequireJWT 之后。
 *
 * ```rust,ignore
 * web::resource("")
 *     .route(web::post().to(create_submission).wrap(RequireRole::new(&UserRole::Student)))
 * ```
 *
 * 课程内的身份（课程教授 / 选课学生）由 RequireClassRole 校验。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::middlewares::RequireJWT;
use crate::models::{ErrorCode, users::entities::UserRole};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    role: UserRole,
}

impl RequireRole {
    pub fn new(role: &UserRole) -> Self {
        Self { role: role.clone() }
    }
}

fn denied_message(role: &UserRole) -> &'static str {
    match role {
        UserRole::Professor => "Only professors can perform this action",
        UserRole::Student => "Only students can perform this action",
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            role: self.role.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    role: UserRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let required = self.role.clone();

        Box::pin(async move {
            let Some(user) = RequireJWT::extract_user_claims(req.request()) else {
                info!("Role check on {} without an authenticated user", req.path());
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if user.role != required {
                info!(
                    "User {} ({}) denied on {}: requires {}",
                    user.username,
                    user.role,
                    req.path(),
                    required
                );
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::Forbidden,
                        denied_message(&required),
                    )
                    .map_into_right_body(),
                ));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}
