use std::result::Result;

use snafu::ResultExt;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{registry, EnvFilter};

use crate::config::Config;
use crate::error::{InitError, InitializeLoggerSnafu};
use crate::seo::SeoReport;
use crate::store::StoreError;
use crate::time::Day;

pub fn init(config: &Config) -> Result<WorkerGuard, InitError> {
    let (file_layer, guard) = {
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "folio.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let layer = layer().with_ansi(false).json().with_writer(non_blocking);

        (layer, guard)
    };

    let console_layer = layer().pretty().with_writer(std::io::stdout);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber).context(InitializeLoggerSnafu)?;

    Ok(guard)
}

/// A component-scoped logger handed to each service when it is built.
///
/// Every event carries the `component` field so the log output of the view counter,
/// the analytics queries and the SEO scorer can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logger {
    component: &'static str,
}

impl Logger {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn view_recorded(&self, content_id: &str, day: Day, unique: bool) {
        tracing::debug!(component = self.component, %content_id, %day, unique, "recorded view");
    }

    pub fn view_dropped(&self, content_id: &str, visitor_id: &str, error: &StoreError) {
        tracing::warn!(
            component = self.component,
            %content_id,
            %visitor_id,
            %error,
            "failed to record view of `{}`, dropping it",
            content_id
        );
    }

    pub fn stats_queried(&self, content_id: &str, days: u32, rows: usize) {
        tracing::debug!(component = self.component, %content_id, days, rows, "queried content stats");
    }

    pub fn top_content_queried(&self, limit: usize, days: u32, found: usize) {
        tracing::debug!(component = self.component, limit, days, found, "queried top content");
    }

    pub fn missing_content(&self, content_id: &str) {
        tracing::info!(
            component = self.component,
            %content_id,
            "content `{}` has views but no longer exists",
            content_id
        );
    }

    pub fn seo_analyzed(&self, content_id: &str, report: &SeoReport) {
        tracing::info!(
            component = self.component,
            %content_id,
            score = report.score,
            passed = report.passed(),
            "analyzed seo of `{}`",
            content_id
        );
    }

    pub fn query_failed(&self, operation: &'static str, error: &StoreError) {
        tracing::error!(component = self.component, operation, %error, "{} failed: {}", operation, error);
    }
}
