use crate::cache::{
    ObjectCache,
    register::{get_object_cache_plugin, registered_object_cache_plugins},
};
use crate::config::AppConfig;
use crate::grading::GradeCalculator;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub calculator: GradeCalculator,
}

/// 按名称构造缓存后端
async fn build_cache(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            info!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = config.cache.cache_type.as_str();

    info!("Attempting to create {} cache backend", cache_type);

    if get_object_cache_plugin(cache_type).is_none() {
        warn!(
            "Cache backend '{}' not found in registry (available: {})",
            cache_type,
            registered_object_cache_plugins().join(", ")
        );
    } else if let Some(cache) = build_cache(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        if let Some(cache) = build_cache("moka").await {
            return Ok(cache);
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和评分器
pub async fn prepare_server_startup() -> Result<StartupContext, Box<dyn std::error::Error>> {
    // 已安装时返回 Err，忽略即可
    let _ = rustls::crypto::ring::default_provider().install_default();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage().await?;
    info!("Storage backend initialized and migrations completed");

    let cache = create_cache().await?;
    info!("Cache backend initialized");

    let policy = AppConfig::get().grading.clone();
    info!(
        "Grading policy: reference total {}, thresholds A>={} B>={} C>={} D>={} E>={}, enforce track maxima: {}",
        policy.reference_total,
        policy.thresholds.a,
        policy.thresholds.b,
        policy.thresholds.c,
        policy.thresholds.d,
        policy.thresholds.e,
        policy.enforce_track_maxima
    );

    Ok(StartupContext {
        storage,
        cache,
        calculator: GradeCalculator::new(policy),
    })
}
