//! HTTP surface of the analytics and SEO services.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use snafu::ensure;
use tracing::instrument;

use crate::analytics::{ContentStats, DashboardSummary, TopContent};
use crate::cache::VisitorCache;
use crate::config::{MAX_TOP_LIMIT, MAX_WINDOW_DAYS};
use crate::prelude::*;
use crate::seo::{SeoMetadata, SeoReport};
use crate::store::Store;

pub use error::*;
pub use state::App;

mod error;
mod state;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;


pub fn router<S, C>(app: App<S, C>) -> Router
where
    S: Store,
    C: VisitorCache + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/analytics/content/:id/views", post(record_view::<S, C>))
        .route("/api/analytics/content/:id", get(content_stats::<S, C>))
        .route("/api/analytics/top", get(top_content::<S, C>))
        .route("/api/analytics/dashboard", get(dashboard::<S, C>))
        .route("/api/seo/content/:id/analysis", get(seo_analysis::<S, C>))
        .route("/api/seo/content/:id/metadata", get(seo_metadata::<S, C>))
        .with_state(app)
}

async fn health() -> &'static str {
    "ok"
}

/// Identifies the visitor by the client address, preferring the proxy headers.
fn visitor_id(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };

    let forwarded = header("x-forwarded-for").and_then(|value| {
        value
            .split(',')
            .next()
            .map(str::trim)
            .filter(|first| !first.is_empty())
            .map(str::to_owned)
    });
    let real_ip = header("x-real-ip")
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty());

    forwarded
        .or(real_ip)
        .or_else(|| peer.map(|address| address.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_owned())
}

#[instrument(skip(app, headers, peer))]
async fn record_view<S: Store, C: VisitorCache + 'static>(
    State(app): State<App<S, C>>,
    Path(content_id): Path<String>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
) -> StatusCode {
    let visitor = visitor_id(&headers, peer.map(|ConnectInfo(address)| address));
    app.counter.record_view(&content_id, &visitor).await;

    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub limit: Option<usize>,
    pub days: Option<u32>,
}

fn days_param(days: Option<u32>, default: u32) -> Result<u32> {
    let days = days.unwrap_or(default);
    ensure!(
        (1..=MAX_WINDOW_DAYS).contains(&days),
        InvalidQuerySnafu {
            parameter: "days",
            value: u64::from(days),
            min: 1u64,
            max: u64::from(MAX_WINDOW_DAYS),
        }
    );

    Ok(days)
}

fn limit_param(limit: Option<usize>, default: usize) -> Result<usize> {
    let limit = limit.unwrap_or(default);
    ensure!(
        (1..=MAX_TOP_LIMIT).contains(&limit),
        InvalidQuerySnafu {
            parameter: "limit",
            value: limit as u64,
            min: 1u64,
            max: MAX_TOP_LIMIT as u64,
        }
    );

    Ok(limit)
}

#[instrument(skip(app))]
async fn content_stats<S: Store, C: VisitorCache + 'static>(
    State(app): State<App<S, C>>,
    Path(content_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ContentStats>> {
    let days = days_param(query.days, app.config().default_days)?;
    let stats = app
        .analytics
        .content_stats(&content_id, days)
        .await
        .context(QuerySnafu)?;

    Ok(Json(stats))
}

#[instrument(skip(app))]
async fn top_content<S: Store, C: VisitorCache + 'static>(
    State(app): State<App<S, C>>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<TopContent>>> {
    let limit = limit_param(query.limit, app.config().default_limit)?;
    let days = days_param(query.days, app.config().default_days)?;
    let top = app
        .analytics
        .top_content(limit, days)
        .await
        .context(QuerySnafu)?;

    Ok(Json(top))
}

#[instrument(skip(app))]
async fn dashboard<S: Store, C: VisitorCache + 'static>(
    State(app): State<App<S, C>>,
) -> Result<Json<DashboardSummary>> {
    let summary = app.analytics.dashboard_summary().await.context(QuerySnafu)?;
    Ok(Json(summary))
}

#[instrument(skip(app))]
async fn seo_analysis<S: Store, C: VisitorCache + 'static>(
    State(app): State<App<S, C>>,
    Path(content_id): Path<String>,
) -> Result<Json<SeoReport>> {
    Ok(Json(app.seo.analyze_seo(&content_id).await?))
}

#[instrument(skip(app))]
async fn seo_metadata<S: Store, C: VisitorCache + 'static>(
    State(app): State<App<S, C>>,
    Path(content_id): Path<String>,
) -> Result<Json<SeoMetadata>> {
    Ok(Json(app.seo.seo_metadata(&content_id).await?))
}
