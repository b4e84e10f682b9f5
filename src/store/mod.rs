//! Repositories behind the analytics and SEO services.
//!
//! Each trait exposes the query shapes the services need and nothing more:
//! upsert-by-key and range/group queries for the daily counters, lookups and counts for content.

use std::future::Future;

use crate::model::{Author, Content, ContentStatus, ContentViews, DailyViews, Role, ViewTotals};
use crate::time::Day;

pub use error::*;
pub use memory::MemoryStore;
pub use surreal::SurrealStore;

mod error;
mod memory;
mod surreal;

pub trait ViewRepository: Send + Sync {
    /// Atomically adds one view to the `(content_id, day)` counter, creating it if needed,
    /// and one unique visitor when `unique` is set.
    fn increment_daily(
        &self,
        content_id: &str,
        day: Day,
        unique: bool,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Daily rows of one content item from `since` onwards, newest day first.
    fn daily_views(
        &self,
        content_id: &str,
        since: Day,
    ) -> impl Future<Output = Result<Vec<DailyViews>>> + Send;

    /// Counters summed per content item from `since` onwards, in no particular order.
    fn views_by_content(&self, since: Day)
        -> impl Future<Output = Result<Vec<ContentViews>>> + Send;

    /// Counters summed over every content item, from `since` onwards or over all time.
    fn total_views(&self, since: Option<Day>) -> impl Future<Output = Result<ViewTotals>> + Send;
}

pub trait ContentRepository: Send + Sync {
    fn content(&self, id: &str) -> impl Future<Output = Result<Option<Content>>> + Send;

    fn author(&self, id: &str) -> impl Future<Output = Result<Option<Author>>> + Send;

    /// Number of content items per status. Statuses without content may be left out.
    fn status_counts(&self) -> impl Future<Output = Result<Vec<(ContentStatus, u64)>>> + Send;

    /// Number of content items per role of their author. Content without a known author is left out.
    fn role_counts(&self) -> impl Future<Output = Result<Vec<(Role, u64)>>> + Send;
}

/// A backing store serving both repositories, shared by every service of the app.
pub trait Store: ViewRepository + ContentRepository + Clone + 'static {}

impl<T> Store for T where T: ViewRepository + ContentRepository + Clone + 'static {}
