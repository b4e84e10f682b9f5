//! Dedupe sets of the view counter: which visitors have already viewed a content item today.

use std::future::Future;

use crate::prelude::*;
use crate::store::Result;

pub use memory::MemoryCache;
#[cfg(feature = "redis")]
pub use redis_set::RedisCache;

mod memory;
#[cfg(feature = "redis")]
mod redis_set;
mod timing_map;

/// Identifies one dedupe set: a content item on a UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, new)]
pub struct VisitorKey {
    pub content_id: String,
    pub day: Day,
}

impl std::fmt::Display for VisitorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "views:{}:{}", self.content_id, self.day)
    }
}

/// Set-membership storage for visitor identifiers, with expiry per set.
pub trait VisitorCache: Send + Sync {
    /// Whether `visitor_id` is in the set of `key`. Expired sets are empty.
    fn contains(
        &self,
        key: &VisitorKey,
        visitor_id: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Adds `visitor_id` to the set of `key` and moves the set's expiry to `expires_at`.
    fn insert(
        &self,
        key: &VisitorKey,
        visitor_id: &str,
        expires_at: Timestamp,
    ) -> impl Future<Output = Result<()>> + Send;
}
