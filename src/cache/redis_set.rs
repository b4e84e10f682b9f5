use redis::aio::ConnectionManager;
use redis::AsyncCommands as _;
use url::Url;

use super::{VisitorCache, VisitorKey};
use crate::prelude::*;
use crate::store::{CacheSnafu, Result, StoreError};

/// Dedupe sets stored as Redis sets, one key per content item and day.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}

fn cache_error(error: redis::RedisError) -> StoreError {
    CacheSnafu {
        message: error.to_string(),
    }
    .build()
}

impl RedisCache {
    pub async fn connect(url: &Url) -> Result<Self> {
        let client = redis::Client::open(url.as_str()).map_err(cache_error)?;
        let connection = client
            .get_connection_manager()
            .await
            .map_err(cache_error)?;

        tracing::info!(%url, "connected to the visitor cache");
        Ok(Self { connection })
    }
}

impl VisitorCache for RedisCache {
    async fn contains(&self, key: &VisitorKey, visitor_id: &str) -> Result<bool> {
        let mut connection = self.connection.clone();
        connection
            .sismember(key.to_string(), visitor_id)
            .await
            .map_err(cache_error)
    }

    async fn insert(&self, key: &VisitorKey, visitor_id: &str, expires_at: Timestamp) -> Result<()> {
        let mut connection = self.connection.clone();
        let key = key.to_string();

        redis::pipe()
            .atomic()
            .sadd(&key, visitor_id)
            .ignore()
            .cmd("EXPIREAT")
            .arg(&key)
            .arg(expires_at.timestamp())
            .ignore()
            .query_async::<_, ()>(&mut connection)
            .await
            .map_err(cache_error)
    }
}
