use crate::cache::{ObjectCache, create_object_cache};
use crate::config::AppConfig;
use crate::grading::{DEFAULT_PROMPT_TEMPLATE, DEFAULT_PROMPT_TITLE, GradingService};
use crate::middlewares::RateLimitStore;
use crate::routes;
use crate::storage::Storage;
use crate::utils::{json_error_handler, query_error_handler};
use actix_web::web;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 服务运行所需的共享状态，每个 worker 的 App 都从这里取 app data
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub grading: Arc<GradingService>,
    pub rate_limits: RateLimitStore,
}

impl StartupContext {
    /// 注册 app data、参数错误处理器和全部路由
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        let config = AppConfig::get();
        cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.cache.clone()))
            .app_data(web::Data::new(self.grading.clone()))
            .app_data(web::Data::new(self.rate_limits.clone()))
            .configure(routes::configure_routes);
    }
}

/// 写入内置的全局评分模板
async fn seed_default_prompt(storage: &Arc<dyn Storage>) {
    match storage
        .seed_global_prompt(DEFAULT_PROMPT_TITLE, DEFAULT_PROMPT_TEMPLATE)
        .await
    {
        Ok(true) => info!("Seeded global grading prompt '{}'", DEFAULT_PROMPT_TITLE),
        Ok(false) => debug!("Global grading prompt already present, skipping seed"),
        Err(e) => warn!("Failed to seed global grading prompt: {}", e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和评分服务
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = AppConfig::get();
    if config.uses_default_jwt_secret() {
        warn!("Using the built-in JWT secret, set JWT_SECRET in production");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_default_prompt(&storage).await;

    let cache = create_object_cache();
    warn!("Cache backend initialized");

    let grading = GradingService::new(&config.ai).expect("Failed to create grading service");
    if config.ai.is_configured() {
        warn!(
            "AI grading enabled: endpoint {}, model {}",
            config.ai.endpoint, config.ai.model
        );
    }

    StartupContext {
        storage,
        cache,
        grading: Arc::new(grading),
        rate_limits: RateLimitStore::new(),
    }
}
