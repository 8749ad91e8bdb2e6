use serde::Deserialize;

use canteen_core::config::Config;

/// Breaks service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct BreaksConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3121). Env var: `BREAKS_PORT`.
    #[serde(default = "default_port")]
    pub breaks_port: u16,
    /// Status watcher tick in milliseconds (default 1000). Env var: `BREAKS_TICK_MILLIS`.
    #[serde(default = "default_tick_millis")]
    pub breaks_tick_millis: u64,
    /// How often the break catalog is re-read from the database (default 30).
    /// Env var: `BREAKS_REFRESH_SECS`.
    #[serde(default = "default_refresh_secs")]
    pub breaks_refresh_secs: u64,
}

impl Config for BreaksConfig {}

fn default_port() -> u16 {
    3121
}

fn default_tick_millis() -> u64 {
    1000
}

fn default_refresh_secs() -> u64 {
    30
}
