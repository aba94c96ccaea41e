//! Environment-driven configuration.

use anyhow::Context;
use figment::{Figment, providers::Env};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the classroom-analytics API, e.g. `http://localhost:8000`.
    pub upstream_base_url: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Building code kept out of the selectable filter set. Empty disables
    /// the exclusion.
    #[serde(default = "default_excluded_building")]
    pub excluded_building: String,

    /// Seconds between background refreshes of the building directory.
    #[serde(default = "default_directory_refresh_secs")]
    pub directory_refresh_secs: u64,

    /// Seconds a rendered overview snapshot stays fresh.
    #[serde(default = "default_overview_ttl_secs")]
    pub overview_ttl_secs: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds to wait for services to drain on shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Figment::new()
            .merge(Env::raw())
            .extract()
            .context("Failed to load config")
    }

    /// The excluded building code, with the empty-string sentinel mapped to
    /// "no exclusion".
    pub fn excluded_building(&self) -> Option<String> {
        let code = self.excluded_building.trim();
        if code.is_empty() {
            None
        } else {
            Some(code.to_owned())
        }
    }
}

fn default_port() -> u16 {
    8080
}

// The off-campus placeholder has no rooms worth aggregating.
fn default_excluded_building() -> String {
    "OFCP".to_owned()
}

fn default_directory_refresh_secs() -> u64 {
    30 * 60
}

fn default_overview_ttl_secs() -> u64 {
    5 * 60
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_shutdown_timeout() -> u64 {
    30
}
