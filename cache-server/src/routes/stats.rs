//! `GET /api/stats`, `POST /api/stats/reset`

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    #[serde(rename = "hitRatePercent")]
    pub hit_rate_percent: f64,
    #[serde(rename = "opsPerSec")]
    pub ops_per_sec: u64,
    #[serde(rename = "memoryUsagePercent")]
    pub memory_usage_percent: f64,
    pub timestamp: u64,
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.cache.stats();
    let max_bytes = state.cache.max_bytes();
    let memory_usage_percent = if max_bytes == 0 {
        0.0
    } else {
        (state.cache.current_bytes() as f64 / max_bytes as f64) * 100.0
    };
    Json(StatsResponse {
        hits: snapshot.hits,
        misses: snapshot.misses,
        evictions: snapshot.evictions,
        expirations: snapshot.expirations,
        hit_rate_percent: snapshot.hit_rate_percent,
        ops_per_sec: snapshot.ops_per_sec,
        memory_usage_percent,
        timestamp: now_ms(),
    })
}

#[derive(Debug, Serialize)]
pub struct StatsResetResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: u64,
}

pub async fn stats_reset(State(state): State<AppState>) -> Json<StatsResetResponse> {
    state.cache.reset_stats();
    Json(StatsResetResponse {
        success: true,
        message: "statistics reset".to_string(),
        timestamp: now_ms(),
    })
}
