use std::sync::Arc;

use crate::analytics::{AnalyticsService, ViewCounter};
use crate::cache::VisitorCache;
use crate::config::AnalyticsConfig;
use crate::prelude::*;
use crate::seo::SeoService;
use crate::store::Store;

/// Shared state of the HTTP handlers.
#[derive(Debug)]
pub struct App<S, C> {
    pub counter: Arc<ViewCounter<S, C>>,
    pub analytics: Arc<AnalyticsService<S>>,
    pub seo: Arc<SeoService<S>>,
}

impl<S, C> Clone for App<S, C> {
    fn clone(&self) -> Self {
        Self {
            counter: self.counter.clone(),
            analytics: self.analytics.clone(),
            seo: self.seo.clone(),
        }
    }
}

impl<S: Store, C: VisitorCache> App<S, C> {
    pub fn new(store: S, cache: C, config: AnalyticsConfig) -> Self {
        let counter = ViewCounter::new(store.clone(), cache, config, Logger::new("views"));
        let analytics = AnalyticsService::new(store.clone(), config, Logger::new("analytics"));
        let seo = SeoService::new(store, Logger::new("seo"));

        App {
            counter: Arc::new(counter),
            analytics: Arc::new(analytics),
            seo: Arc::new(seo),
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        self.analytics.config()
    }
}
