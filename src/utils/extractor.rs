//! 路径参数提取器
//!
//! 解析失败时直接返回 400 和统一的响应结构，不进入处理函数。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_i64(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let message = format!("Invalid path parameter '{name}': '{raw}'");
            let response = HttpResponse::BadRequest()
                .json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, &message));
            Err(InternalError::from_response(message, response).into())
        }
    }
}

macro_rules! define_safe_id_extractor {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_i64(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_id_extractor! {
    SafeIDI64 => "id",
    SafeClassIdI64 => "class_id",
    SafeUserIdI64 => "user_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    async fn echo(id: SafeClassIdI64) -> HttpResponse {
        HttpResponse::Ok().body(id.0.to_string())
    }

    #[actix_web::test]
    async fn test_rejects_non_numeric_id() {
        let app =
            test::init_service(App::new().route("/classes/{class_id}", web::get().to(echo))).await;

        let req = test::TestRequest::get().uri("/classes/12").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "12");

        for bad in ["abc", "0", "-3"] {
            let req = test::TestRequest::get()
                .uri(&format!("/classes/{bad}"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        }
    }
}
