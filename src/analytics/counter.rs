use crate::cache::{VisitorCache, VisitorKey};
use crate::config::AnalyticsConfig;
use crate::prelude::*;
use crate::store::{Result, ViewRepository};

/// Counts page views per content item and UTC day, deduplicating visitors.
///
/// Recording is best effort: a failing cache or repository is logged and the view is dropped,
/// the caller never sees an error.
///
/// The membership check and the insert are two separate round trips, so two concurrent first
/// views from the same visitor can both be counted as unique. That overcount is accepted.
#[derive(Debug, new)]
pub struct ViewCounter<V, C> {
    views: V,
    cache: C,
    config: AnalyticsConfig,
    logger: Logger,
}

impl<V, C> ViewCounter<V, C>
where
    V: ViewRepository,
    C: VisitorCache,
{
    pub async fn record_view(&self, content_id: &str, visitor_id: &str) {
        self.record_view_at(content_id, visitor_id, now()).await
    }

    /// Records a view as if it happened at `now`.
    pub async fn record_view_at(&self, content_id: &str, visitor_id: &str, now: Timestamp) {
        if let Err(error) = self.try_record(content_id, visitor_id, now).await {
            self.logger.view_dropped(content_id, visitor_id, &error);
        }
    }

    async fn try_record(&self, content_id: &str, visitor_id: &str, now: Timestamp) -> Result<()> {
        let day = Day::of(now);
        let key = VisitorKey::new(content_id.to_owned(), day);

        let expires_at = now
            .checked_add_signed(self.config.visitor_ttl)
            .unwrap_or(Timestamp::MAX_UTC);

        let unique = !self.cache.contains(&key, visitor_id).await?;
        self.cache.insert(&key, visitor_id, expires_at).await?;
        self.views.increment_daily(content_id, day, unique).await?;

        self.logger.view_recorded(content_id, day, unique);
        Ok(())
    }
}
