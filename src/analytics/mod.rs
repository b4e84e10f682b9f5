//! View counting and the queries over the daily counters.

use std::collections::BTreeMap;

use futures::future::try_join_all;

use crate::config::AnalyticsConfig;
use crate::model::{ContentStatus, ContentSummary, ContentViews, DailyViews, Role, ViewTotals};
use crate::prelude::*;
use crate::store::{ContentRepository, Result, ViewRepository};
use crate::time::Window;

pub use counter::ViewCounter;

mod counter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub days: u32,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

impl From<Window> for Period {
    fn from(window: Window) -> Self {
        Self {
            days: window.days,
            start_date: window.start.start(),
            end_date: window.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub date: Day,
    pub views: u64,
    pub unique_visitors: u64,
}

impl From<DailyViews> for DailyStat {
    fn from(row: DailyViews) -> Self {
        Self {
            date: row.day,
            views: row.views,
            unique_visitors: row.unique_visitors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub content_id: String,
    pub period: Period,
    pub totals: ViewTotals,
    pub daily_stats: Vec<DailyStat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopContent {
    pub content: ContentSummary,
    pub views: u64,
    pub unique_visitors: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardViews {
    pub last_30_days: u64,
    pub all_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub content_by_status: BTreeMap<ContentStatus, u64>,
    pub content_by_role: BTreeMap<Role, u64>,
    pub views: DashboardViews,
    pub total_content: u64,
}

/// Read side of the analytics: stats of one content item, top content, dashboard.
#[derive(Debug, new)]
pub struct AnalyticsService<S> {
    store: S,
    config: AnalyticsConfig,
    logger: Logger,
}

impl<S> AnalyticsService<S>
where
    S: ViewRepository + ContentRepository,
{
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub async fn content_stats(&self, content_id: &str, days: u32) -> Result<ContentStats> {
        self.content_stats_at(content_id, days, now()).await
    }

    pub async fn content_stats_at(
        &self,
        content_id: &str,
        days: u32,
        now: Timestamp,
    ) -> Result<ContentStats> {
        let window = Window::trailing(days, now);
        let rows = self
            .store
            .daily_views(content_id, window.start)
            .await
            .inspect_err(|error| self.logger.query_failed("content_stats", error))?;

        self.logger.stats_queried(content_id, days, rows.len());

        Ok(ContentStats {
            content_id: content_id.to_owned(),
            period: window.into(),
            totals: rows.iter().sum(),
            daily_stats: rows.into_iter().map(DailyStat::from).collect(),
        })
    }

    pub async fn top_content(&self, limit: usize, days: u32) -> Result<Vec<TopContent>> {
        self.top_content_at(limit, days, now()).await
    }

    pub async fn top_content_at(
        &self,
        limit: usize,
        days: u32,
        now: Timestamp,
    ) -> Result<Vec<TopContent>> {
        let window = Window::trailing(days, now);
        let mut grouped = self
            .store
            .views_by_content(window.start)
            .await
            .inspect_err(|error| self.logger.query_failed("top_content", error))?;

        grouped.sort_by(|a, b| {
            b.views
                .cmp(&a.views)
                .then_with(|| a.content_id.cmp(&b.content_id))
        });
        grouped.truncate(limit);

        let joined = try_join_all(grouped.into_iter().map(|views| self.join_content(views)))
            .await
            .inspect_err(|error| self.logger.query_failed("top_content", error))?;

        let top: Vec<TopContent> = joined.into_iter().flatten().collect();
        self.logger.top_content_queried(limit, days, top.len());
        Ok(top)
    }

    async fn join_content(&self, views: ContentViews) -> Result<Option<TopContent>> {
        let Some(content) = self.store.content(&views.content_id).await? else {
            self.logger.missing_content(&views.content_id);
            return Ok(None);
        };

        let author = self.store.author(&content.author_id).await?;

        Ok(Some(TopContent {
            content: ContentSummary::from_content(&content, author.as_ref()),
            views: views.views,
            unique_visitors: views.unique_visitors,
        }))
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        self.dashboard_summary_at(now()).await
    }

    pub async fn dashboard_summary_at(&self, now: Timestamp) -> Result<DashboardSummary> {
        let window = Window::trailing(self.config.dashboard_days, now);

        let (statuses, roles, recent, all_time) = futures::try_join!(
            self.store.status_counts(),
            self.store.role_counts(),
            self.store.total_views(Some(window.start)),
            self.store.total_views(None),
        )
        .inspect_err(|error| self.logger.query_failed("dashboard_summary", error))?;

        let mut content_by_status: BTreeMap<ContentStatus, u64> =
            ContentStatus::ALL.into_iter().map(|status| (status, 0)).collect();
        content_by_status.extend(statuses);

        let mut content_by_role: BTreeMap<Role, u64> =
            Role::ALL.into_iter().map(|role| (role, 0)).collect();
        content_by_role.extend(roles);

        Ok(DashboardSummary {
            total_content: content_by_status.values().sum(),
            content_by_status,
            content_by_role,
            views: DashboardViews {
                last_30_days: recent.views,
                all_time: all_time.views,
            },
        })
    }
}
