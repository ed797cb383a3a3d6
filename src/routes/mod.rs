pub mod assignments;
pub mod auth;
pub mod classes;
pub mod prompts;
pub mod submissions;

pub use assignments::configure_assignments_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use prompts::configure_prompts_routes;
pub use submissions::configure_submissions_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_classes_routes)
        .configure(configure_assignments_routes)
        .configure(configure_submissions_routes)
        .configure(configure_prompts_routes);
}
