//! 对象缓存
//!
//! 认证中间件按 access token 缓存用户信息，值为 JSON 字符串。

pub mod object_cache;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AppConfig;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
}

/// 按全局配置创建缓存
pub fn create_object_cache() -> Arc<dyn ObjectCache> {
    let config = AppConfig::get();
    Arc::new(object_cache::moka::MokaCacheWrapper::new(&config.cache))
}
