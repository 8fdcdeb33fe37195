use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 服务运行状态
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct HealthResponse {
    pub status: String,
    pub system_name: String,
    pub version: String,
    pub environment: String,
    pub started_at: String,   // RFC 3339
    pub uptime_seconds: i64,
}

/// 数据库连通性
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct DatabaseHealthResponse {
    pub status: String,
    pub latency_ms: u64,
}
