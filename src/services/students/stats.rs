use std::sync::atomic::{AtomicU64, Ordering};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Serialize;
use tracing::debug;

use super::{StudentService, storage_unavailable};
use crate::cache::ObjectCache;
use crate::grading::{StatisticsAggregator, TrackFilter};
use crate::models::students::entities::ClassType;
use crate::models::students::requests::StatsQuery;
use crate::models::students::stats_responses::{DetailedStats, StudentStats};
use crate::models::{ApiResponse, ErrorCode};

pub(crate) const OVERVIEW_CACHE_KEY: &str = "students:stats:overview";

/// 统计缓存代数
///
/// 每次学生数据变更后加一。读取方在查询前记下代数，
/// 写缓存前后代数发生变化则放弃写入，避免旧结果覆盖失效。
#[derive(Debug, Default)]
pub struct StatsGeneration(AtomicU64);

impl StatsGeneration {
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// 学生数据变更后清除所有统计缓存
pub(crate) async fn invalidate_stats_cache(
    cache: Option<&(dyn ObjectCache + 'static)>,
    generation: Option<&StatsGeneration>,
) {
    // 先递增代数再删除，并发读取方据此丢弃旧结果
    if let Some(generation) = generation {
        generation.bump();
    }
    let Some(cache) = cache else {
        return;
    };
    cache.remove(OVERVIEW_CACHE_KEY).await;
    for filter in [
        TrackFilter::All,
        TrackFilter::Track(ClassType::Science),
        TrackFilter::Track(ClassType::SocialScience),
    ] {
        cache.remove(&filter.cache_key()).await;
    }
}

/// 仅当代数未变化时写入缓存，返回是否保留了该条目
pub(crate) async fn store_stats<T: Serialize>(
    cache: &(dyn ObjectCache + 'static),
    generation: &StatsGeneration,
    key: &str,
    value: &T,
    observed: u64,
) -> bool {
    if generation.current() != observed {
        debug!("Stats changed during computation, skip caching: {}", key);
        return false;
    }
    cache.insert_json(key, value, 0).await;
    // 写入期间发生失效时撤销本次写入
    if generation.current() != observed {
        cache.remove(key).await;
        debug!("Stats invalidated while caching, entry dropped: {}", key);
        return false;
    }
    true
}

pub async fn get_overview_stats(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let cache = service.get_cache(request);
    if let Some(cache) = cache.as_deref()
        && let Some(stats) = cache.get_json::<StudentStats>(OVERVIEW_CACHE_KEY).await
    {
        debug!("Overview stats served from cache");
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Overview statistics retrieved successfully",
        )));
    }

    let Some(storage) = service.get_storage(request) else {
        return Ok(storage_unavailable());
    };

    // 查询前记下代数
    let generation = service.get_stats_generation(request);
    let observed = generation.as_deref().map(StatsGeneration::current);

    let students = match storage.list_all_students(None).await {
        Ok(students) => students,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to compute statistics: {e}"),
                )),
            );
        }
    };

    let calculator = service.get_calculator(request);
    let stats = StatisticsAggregator::new(&calculator).overview(&students);

    if let (Some(cache), Some(generation), Some(observed)) =
        (cache.as_deref(), generation.as_deref(), observed)
    {
        store_stats(cache, generation, OVERVIEW_CACHE_KEY, &stats, observed).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        stats,
        "Overview statistics retrieved successfully",
    )))
}

pub async fn get_detailed_stats(
    service: &StudentService,
    query: StatsQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let filter = TrackFilter::parse(query.class_type.as_deref());
    let cache_key = filter.cache_key();

    let cache = service.get_cache(request);
    if let Some(cache) = cache.as_deref()
        && let Some(stats) = cache.get_json::<DetailedStats>(&cache_key).await
    {
        debug!("Detailed stats served from cache: {}", cache_key);
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Detailed statistics retrieved successfully",
        )));
    }

    let Some(storage) = service.get_storage(request) else {
        return Ok(storage_unavailable());
    };

    let generation = service.get_stats_generation(request);
    let observed = generation.as_deref().map(StatsGeneration::current);

    let students = match storage.list_all_students(filter.class_type()).await {
        Ok(students) => students,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to compute statistics: {e}"),
                )),
            );
        }
    };

    let calculator = service.get_calculator(request);
    let stats = StatisticsAggregator::new(&calculator).detailed(&students, filter);

    if let (Some(cache), Some(generation), Some(observed)) =
        (cache.as_deref(), generation.as_deref(), observed)
    {
        store_stats(cache, generation, &cache_key, &stats, observed).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        stats,
        "Detailed statistics retrieved successfully",
    )))
}
