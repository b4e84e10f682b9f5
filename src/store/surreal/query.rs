use serde::de::DeserializeOwned;
use snafu::ResultExt as _;
use surrealdb::opt::QueryResult;

use crate::store::{DatabaseDeserializeSnafu, DatabaseQuerySnafu, Result};

/// A SurrealQL statement with its parameters, built by [super::SurrealStore::sql].
///
/// # Example
/// ```ignore
/// let rows: Vec<DailyViews> = store
///     .sql("SELECT * FROM daily_views WHERE content_id = $content_id")
///     .bind(("content_id", "c1"))
///     .fetch()
///     .await?;
/// ```
#[derive(Debug)]
pub struct Bindings<'a> {
    query: surrealdb::method::Query<'a, surrealdb::engine::any::Any>,
}

impl<'a> Bindings<'a> {
    pub(super) fn new(query: surrealdb::method::Query<'a, surrealdb::engine::any::Any>) -> Self {
        Self { query }
    }

    pub fn bind(mut self, params: impl serde::Serialize) -> Self {
        let query = self.query;
        self.query = query.bind(params);
        self
    }

    /// Execute the statements and fail if any of them failed.
    pub async fn execute(self) -> Result<surrealdb::Response> {
        let response = self
            .query
            .await
            .context(DatabaseQuerySnafu)?
            .check()
            .context(DatabaseQuerySnafu)?;
        tracing::trace!(?response, "executed query");
        Ok(response)
    }

    /// Execute the query and deserialize the result of its first statement.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<T>
    where
        usize: QueryResult<T>,
    {
        let mut response = self.execute().await?;
        response.take::<T>(0).context(DatabaseDeserializeSnafu)
    }
}
