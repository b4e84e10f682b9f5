use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use super::timing_map::TimingMap;
use super::{VisitorCache, VisitorKey};
use crate::prelude::*;
use crate::store::{Result, StoreError, UnavailableSnafu};

/// In-process dedupe sets.
///
/// Lookups check the expiry of their own set only. Expired sets are swept from memory
/// on the first insert of each UTC day.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    sets: TimingMap<VisitorKey, HashSet<String>, Timestamp>,
    swept_on: Option<Day>,
}

impl Inner {
    fn is_live(&self, key: &VisitorKey, now: Timestamp) -> bool {
        self.sets.expires_at(key).map_or(true, |expiry| *expiry > now)
    }

    fn sweep(&mut self, now: Timestamp) {
        self.sets.drain_expired(&now);
        self.swept_on = Some(Day::of(now));
    }

    fn sweep_daily(&mut self, now: Timestamp) {
        if self.swept_on != Some(Day::of(now)) {
            self.sweep(now);
        }
    }
}

impl MemoryCache {
    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| -> StoreError {
            UnavailableSnafu {
                message: "visitor cache lock is poisoned",
            }
            .build()
        })
    }

    /// Number of live dedupe sets.
    pub fn len(&self) -> Result<usize> {
        let mut inner = self.lock()?;
        inner.sweep(now());
        Ok(inner.sets.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn expires_at(&self, key: &VisitorKey) -> Result<Option<Timestamp>> {
        let inner = self.lock()?;
        if !inner.is_live(key, now()) {
            return Ok(None);
        }

        Ok(inner.sets.expires_at(key).copied())
    }
}

impl VisitorCache for MemoryCache {
    async fn contains(&self, key: &VisitorKey, visitor_id: &str) -> Result<bool> {
        let inner = self.lock()?;
        if !inner.is_live(key, now()) {
            return Ok(false);
        }

        Ok(inner
            .sets
            .get(key)
            .map_or(false, |visitors| visitors.contains(visitor_id)))
    }

    async fn insert(&self, key: &VisitorKey, visitor_id: &str, expires_at: Timestamp) -> Result<()> {
        let now = now();
        let mut inner = self.lock()?;
        inner.sweep_daily(now);

        if !inner.is_live(key, now) {
            inner.sets.remove(key);
        }

        inner
            .sets
            .get_or_insert_with(key.clone(), HashSet::new)
            .insert(visitor_id.to_owned());
        inner.sets.refresh(key.clone(), expires_at);
        Ok(())
    }
}
