//! `GET /health`, `GET /health/detailed`

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::config::ConfigSnapshot;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MemoryInfo {
    #[serde(rename = "currentBytes")]
    pub current_bytes: u64,
    #[serde(rename = "maxBytes")]
    pub max_bytes: u64,
    #[serde(rename = "usagePercent")]
    pub usage_percent: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(rename = "uptimeSeconds")]
    pub uptime_seconds: u64,
    pub memory: MemoryInfo,
    pub config: ConfigSnapshot,
}

fn memory_info(state: &AppState) -> MemoryInfo {
    let max_bytes = state.cache.max_bytes();
    let current_bytes = state.cache.current_bytes();
    let usage_percent = if max_bytes == 0 {
        0.0
    } else {
        (current_bytes as f64 / max_bytes as f64) * 100.0
    };
    MemoryInfo {
        current_bytes,
        max_bytes,
        usage_percent,
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_seconds: state.uptime_seconds(),
        memory: memory_info(&state),
        config: ConfigSnapshot::from(state.config.as_ref()),
    })
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub os: &'static str,
    pub arch: &'static str,
    #[serde(rename = "availableParallelism")]
    pub available_parallelism: usize,
}

#[derive(Debug, Serialize)]
pub struct CacheStatsInfo {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    #[serde(rename = "residentKeys")]
    pub resident_keys: usize,
}

#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    #[serde(flatten)]
    pub health: HealthResponse,
    pub stats: CacheStatsInfo,
    pub system: SystemInfo,
}

pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let snapshot = state.cache.stats();
    Json(DetailedHealthResponse {
        health: HealthResponse {
            status: "ok",
            uptime_seconds: state.uptime_seconds(),
            memory: memory_info(&state),
            config: ConfigSnapshot::from(state.config.as_ref()),
        },
        stats: CacheStatsInfo {
            hits: snapshot.hits,
            misses: snapshot.misses,
            evictions: snapshot.evictions,
            expirations: snapshot.expirations,
            resident_keys: state.cache.len(),
        },
        system: SystemInfo {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            available_parallelism: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        },
    })
}
