//! Environment-driven configuration for the HTTP adapter.
//!
//! Every variable has a documented default so the server boots with no
//! environment at all, validating and logging what it resolved rather than
//! requiring anything be set.

use std::env;
use std::sync::Arc;

use cache_engine::config::CacheEngineConfig;
use cache_engine::policy::EvictionPolicyKind;

/// `NODE_ENV` values that redact 500 response bodies and suppress stack
/// detail.
const PRODUCTION_ENV_VALUES: &[&str] = &["production", "prod"];

/// Resolved server configuration: the HTTP-adapter knobs plus the engine
/// configuration they construct.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PORT` — TCP port the server listens on.
    pub port: u16,
    /// `NODE_ENV` — environment tag; `production`/`prod` redacts 500 bodies.
    pub node_env: String,
    /// `CLEANUP_INTERVAL_MS` — background sweeper tick interval.
    pub cleanup_interval_ms: u64,
    /// `LOG_LEVEL` — default `tracing` filter directive.
    pub log_level: String,
    /// `ENABLE_COMPRESSION` — whether to apply the response compression layer.
    pub enable_compression: bool,
    /// `RATE_LIMIT_PER_MINUTE` — per-IP request quota.
    pub rate_limit_per_minute: u32,
    /// `CORS_ORIGINS` — comma-separated allowed origins, or `*`.
    pub cors_origins: String,
    /// The engine configuration derived from `EVICTION_POLICY`,
    /// `MAX_MEMORY_MB`, and `MAX_KEYS`.
    pub engine: CacheEngineConfig,
}

impl ServerConfig {
    /// Loads configuration from the process environment, falling back to
    /// documented defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let policy = env_var("EVICTION_POLICY")
            .and_then(|v| v.parse::<EvictionPolicyKind>().ok())
            .unwrap_or(EvictionPolicyKind::Lru);
        let max_memory_mb = env_parsed("MAX_MEMORY_MB").unwrap_or(512);
        let max_keys = env_parsed("MAX_KEYS").unwrap_or(100_000);

        Self {
            port: env_parsed("PORT").unwrap_or(3000),
            node_env: env_var("NODE_ENV").unwrap_or_else(|| "development".to_string()),
            cleanup_interval_ms: env_parsed("CLEANUP_INTERVAL_MS").unwrap_or(60_000),
            log_level: env_var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            enable_compression: env_parsed("ENABLE_COMPRESSION").unwrap_or(true),
            rate_limit_per_minute: env_parsed("RATE_LIMIT_PER_MINUTE").unwrap_or(100),
            cors_origins: env_var("CORS_ORIGINS")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            engine: CacheEngineConfig {
                policy,
                max_keys,
                max_memory_mb,
                clock: cache_engine::clock::SystemClock::shared(),
            },
        }
    }

    /// Whether 500 response bodies should be redacted and stack detail
    /// suppressed.
    pub fn is_production(&self) -> bool {
        PRODUCTION_ENV_VALUES.contains(&self.node_env.to_ascii_lowercase().as_str())
    }

    /// The allowed CORS origins, parsed from the comma-separated
    /// configuration string. `*` is returned as a single-element list the
    /// caller interprets as "any origin".
    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// A loggable, non-sensitive snapshot of this configuration (there is no
    /// sensitive configuration in this service, but logging a resolved
    /// snapshot rather than raw env vars keeps the door open for one).
    pub fn log_summary(&self) {
        tracing::info!(
            port = self.port,
            node_env = %self.node_env,
            policy = %self.engine.policy,
            max_keys = self.engine.max_keys,
            max_memory_mb = self.engine.max_memory_mb,
            cleanup_interval_ms = self.cleanup_interval_ms,
            rate_limit_per_minute = self.rate_limit_per_minute,
            cors_origins = %self.cors_origins,
            enable_compression = self.enable_compression,
            "resolved configuration",
        );
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// A snapshot of [`ServerConfig`] safe to return from `GET /api/config`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConfigSnapshot {
    pub port: u16,
    pub node_env: String,
    pub eviction_policy: String,
    pub max_memory_mb: u64,
    pub max_keys: usize,
    pub cleanup_interval_ms: u64,
    pub log_level: String,
    pub enable_compression: bool,
    pub rate_limit_per_minute: u32,
    pub cors_origins: String,
}

impl From<&ServerConfig> for ConfigSnapshot {
    fn from(c: &ServerConfig) -> Self {
        Self {
            port: c.port,
            node_env: c.node_env.clone(),
            eviction_policy: c.engine.policy.to_string(),
            max_memory_mb: c.engine.max_memory_mb,
            max_keys: c.engine.max_keys,
            cleanup_interval_ms: c.cleanup_interval_ms,
            log_level: c.log_level.clone(),
            enable_compression: c.enable_compression,
            rate_limit_per_minute: c.rate_limit_per_minute,
            cors_origins: c.cors_origins.clone(),
        }
    }
}

/// Exposed for tests that want a config without touching the environment.
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            node_env: "development".to_string(),
            cleanup_interval_ms: 60_000,
            log_level: "info".to_string(),
            enable_compression: true,
            rate_limit_per_minute: 100,
            cors_origins: "http://localhost:5173".to_string(),
            engine: CacheEngineConfig {
                policy: EvictionPolicyKind::Lru,
                max_keys: 100_000,
                max_memory_mb: 512,
                clock: cache_engine::clock::SystemClock::shared(),
            },
        }
    }
}

/// Used by `main` to wrap the resolved config in an `Arc` shared across
/// handlers.
pub type SharedConfig = Arc<ServerConfig>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.engine.max_memory_mb, 512);
        assert_eq!(config.engine.max_keys, 100_000);
        assert_eq!(config.cleanup_interval_ms, 60_000);
        assert_eq!(config.rate_limit_per_minute, 100);
        assert!(!config.is_production());
    }

    #[test]
    fn production_env_values_are_case_insensitive() {
        let mut config = ServerConfig::default();
        config.node_env = "PRODUCTION".to_string();
        assert!(config.is_production());
    }

    #[test]
    fn cors_origin_list_splits_and_trims() {
        let mut config = ServerConfig::default();
        config.cors_origins = "http://a.test, http://b.test".to_string();
        assert_eq!(
            config.cors_origin_list(),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
