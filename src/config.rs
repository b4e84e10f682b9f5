use std::net::SocketAddr;
use std::path::PathBuf;

use url::Url;

use crate::error::{ConfigSnafu, InitError};
use crate::prelude::*;
use crate::store::{Result as StoreResult, SurrealStore};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address")]
    pub host: SocketAddr,
    #[serde(flatten)]
    pub surreal: SurrealConfig,
    #[serde(default)]
    pub redis_url: Option<Url>,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_days")]
    pub visitor_ttl_days: u32,
    #[serde(default = "default_days")]
    pub default_stats_days: u32,
    #[serde(default = "default_top_limit")]
    pub default_top_limit: usize,
    #[serde(default = "default_days")]
    pub dashboard_window_days: u32,
}

/// Longest trailing window a stats query may cover.
pub const MAX_WINDOW_DAYS: u32 = 365;
pub const MAX_TOP_LIMIT: usize = 100;
/// Ten years.
pub const MAX_VISITOR_TTL_DAYS: u32 = 3650;

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_days() -> u32 {
    30
}

fn default_top_limit() -> usize {
    10
}

impl Config {
    pub fn from_env() -> Result<Config, InitError> {
        envy::from_env::<Config>().context(ConfigSnafu)
    }

    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Config, InitError> {
        envy::from_iter::<_, Config>(pairs).context(ConfigSnafu)
    }

    /// Settings of the analytics services. Out of range values are clamped into
    /// `1..=MAX_WINDOW_DAYS`, `1..=MAX_TOP_LIMIT` and `1..=MAX_VISITOR_TTL_DAYS`.
    pub fn analytics(&self) -> AnalyticsConfig {
        let ttl_days = self.visitor_ttl_days.clamp(1, MAX_VISITOR_TTL_DAYS);

        AnalyticsConfig {
            visitor_ttl: chrono::Duration::days(i64::from(ttl_days)),
            default_days: self.default_stats_days.clamp(1, MAX_WINDOW_DAYS),
            default_limit: self.default_top_limit.clamp(1, MAX_TOP_LIMIT),
            dashboard_days: self.dashboard_window_days.clamp(1, MAX_WINDOW_DAYS),
        }
    }

    pub async fn database(&self) -> StoreResult<SurrealStore> {
        SurrealStore::connect(&self.surreal).await
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SurrealConfig {
    #[serde(rename = "surreal_endpoint")]
    pub endpoint: Url,
    #[serde(rename = "surreal_namespace")]
    pub namespace: String,
    #[serde(rename = "surreal_database")]
    pub database: String,
    #[serde(rename = "surreal_username", default)]
    pub username: Option<String>,
    #[serde(rename = "surreal_password", default)]
    pub password: Option<String>,
}

/// Settings of the analytics services, handed to them when they are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct AnalyticsConfig {
    /// How long a dedupe set lives after its last write.
    pub visitor_ttl: chrono::Duration,
    pub default_days: u32,
    pub default_limit: usize,
    /// Window of the dashboard's recent view count.
    pub dashboard_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            visitor_ttl: chrono::Duration::days(30),
            default_days: 30,
            default_limit: 10,
            dashboard_days: 30,
        }
    }
}
