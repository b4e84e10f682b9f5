use std::collections::BTreeMap;
use std::ops::Deref;

use surrealdb::engine::any::Any;
use surrealdb::opt::auth;
use surrealdb::sql::Thing;
use surrealdb::Surreal;

use super::{ContentRepository, Result, ViewRepository};
use crate::config::SurrealConfig;
use crate::model::{
    Author, Content, ContentStatus, ContentViews, DailyViews, FeaturedImage, Role, ViewTotals,
};
use crate::prelude::*;
use crate::store::DatabaseConnectionSnafu;

pub use query::Bindings;

/// Helper for executing arbitrary SurrealQL queries.
mod query;

const SETUP: &str = include_str!("../../../schema.surrealql");

/// A store on SurrealDB. Any endpoint `surrealdb::engine::any` understands works,
/// including `mem://` for an embedded in-memory database.
#[derive(Debug, Clone)]
pub struct SurrealStore {
    database: Surreal<Any>,
}

impl SurrealStore {
    pub async fn connect(config: &SurrealConfig) -> Result<Self> {
        let url = &config.endpoint;
        let database = surrealdb::engine::any::connect(url.as_str())
            .await
            .context(DatabaseConnectionSnafu { url: url.clone() })?;

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            database
                .signin(auth::Database {
                    namespace: &config.namespace,
                    database: &config.database,
                    username,
                    password,
                })
                .await
                .context(DatabaseConnectionSnafu { url: url.clone() })?;
        }

        database
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .context(DatabaseConnectionSnafu { url: url.clone() })?;

        let store = Self { database };
        store.sql(SETUP).execute().await?;

        tracing::info!(%url, namespace = %config.namespace, database = %config.database, "connected to the database");
        Ok(store)
    }

    /// Create a builder to execute arbitrary SurrealQL on the database.
    pub fn sql(&self, query: &str) -> Bindings<'_> {
        Bindings::new(self.database.query(query))
    }

    pub async fn save_author(&self, author: &Author) -> Result<()> {
        let record = AuthorRecord {
            name: &author.name,
            email: &author.email,
            role: author.role,
        };

        self.sql("UPDATE type::thing('authors', $id) CONTENT $record RETURN NONE")
            .bind(("id", author.id.as_str()))
            .bind(("record", record))
            .execute()
            .await?;
        Ok(())
    }

    pub async fn save_content(&self, content: &Content) -> Result<()> {
        let record = ContentRecord {
            title: &content.title,
            slug: &content.slug,
            status: content.status,
            author: Thing::from(("authors", content.author_id.as_str())),
            body: &content.body,
            excerpt: content.excerpt.as_deref(),
            published_at: content.published_at,
            meta_title: content.meta_title.as_deref(),
            meta_description: content.meta_description.as_deref(),
            featured_image: content.featured_image.as_ref(),
        };

        self.sql("UPDATE type::thing('contents', $id) CONTENT $record RETURN NONE")
            .bind(("id", content.id.as_str()))
            .bind(("record", record))
            .execute()
            .await?;
        Ok(())
    }
}

impl Deref for SurrealStore {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.database
    }
}

#[derive(Debug, Serialize)]
struct AuthorRecord<'a> {
    name: &'a str,
    email: &'a str,
    role: Role,
}

#[derive(Debug, Deserialize)]
struct AuthorRow {
    key: String,
    name: String,
    email: String,
    role: Role,
}

#[derive(Debug, Serialize)]
struct ContentRecord<'a> {
    title: &'a str,
    slug: &'a str,
    status: ContentStatus,
    author: Thing,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    excerpt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    published_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta_title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta_description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    featured_image: Option<&'a FeaturedImage>,
}

#[derive(Debug, Deserialize)]
struct ContentRow {
    key: String,
    author_key: String,
    title: String,
    slug: String,
    status: ContentStatus,
    body: String,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    published_at: Option<Timestamp>,
    #[serde(default)]
    meta_title: Option<String>,
    #[serde(default)]
    meta_description: Option<String>,
    #[serde(default)]
    featured_image: Option<FeaturedImage>,
}

impl From<ContentRow> for Content {
    fn from(row: ContentRow) -> Self {
        Content {
            id: row.key,
            title: row.title,
            slug: row.slug,
            status: row.status,
            author_id: row.author_key,
            body: row.body,
            excerpt: row.excerpt,
            published_at: row.published_at,
            meta_title: row.meta_title,
            meta_description: row.meta_description,
            featured_image: row.featured_image,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TotalsRow {
    views: u64,
    unique_visitors: u64,
}

#[derive(Debug, Deserialize)]
struct StatusRow {
    status: ContentStatus,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct RoleRow {
    #[serde(default)]
    role: Option<Role>,
}

impl ViewRepository for SurrealStore {
    async fn increment_daily(&self, content_id: &str, day: Day, unique: bool) -> Result<()> {
        self.sql(
            "UPDATE type::thing('daily_views', [$content_id, $day]) SET \
                content_id = $content_id, \
                day = $day, \
                views = (views OR 0) + 1, \
                unique_visitors = (unique_visitors OR 0) + $unique \
             RETURN NONE",
        )
        .bind(("content_id", content_id))
        .bind(("day", day))
        .bind(("unique", u64::from(unique)))
        .execute()
        .await?;
        Ok(())
    }

    async fn daily_views(&self, content_id: &str, since: Day) -> Result<Vec<DailyViews>> {
        self.sql(
            "SELECT content_id, day, views, unique_visitors FROM daily_views \
             WHERE content_id = $content_id AND day >= $since ORDER BY day DESC",
        )
        .bind(("content_id", content_id))
        .bind(("since", since))
        .fetch()
        .await
    }

    async fn views_by_content(&self, since: Day) -> Result<Vec<ContentViews>> {
        self.sql(
            "SELECT content_id, math::sum(views) AS views, math::sum(unique_visitors) AS unique_visitors \
             FROM daily_views WHERE day >= $since GROUP BY content_id",
        )
        .bind(("since", since))
        .fetch()
        .await
    }

    async fn total_views(&self, since: Option<Day>) -> Result<ViewTotals> {
        let query = match since {
            Some(since) => self
                .sql(
                    "SELECT math::sum(views) AS views, math::sum(unique_visitors) AS unique_visitors \
                     FROM daily_views WHERE day >= $since GROUP ALL",
                )
                .bind(("since", since)),
            None => self.sql(
                "SELECT math::sum(views) AS views, math::sum(unique_visitors) AS unique_visitors \
                 FROM daily_views GROUP ALL",
            ),
        };

        let row: Option<TotalsRow> = query.fetch().await?;
        Ok(row.map_or_else(ViewTotals::default, |row| ViewTotals {
            views: row.views,
            unique_visitors: row.unique_visitors,
        }))
    }
}

impl ContentRepository for SurrealStore {
    async fn content(&self, id: &str) -> Result<Option<Content>> {
        let row: Option<ContentRow> = self
            .sql(
                "SELECT *, meta::id(id) AS key, meta::id(author) AS author_key \
                 FROM type::thing('contents', $id)",
            )
            .bind(("id", id))
            .fetch()
            .await?;

        Ok(row.map(Content::from))
    }

    async fn author(&self, id: &str) -> Result<Option<Author>> {
        let row: Option<AuthorRow> = self
            .sql("SELECT *, meta::id(id) AS key FROM type::thing('authors', $id)")
            .bind(("id", id))
            .fetch()
            .await?;

        Ok(row.map(|row| Author::new(row.key, row.name, row.email, row.role)))
    }

    async fn status_counts(&self) -> Result<Vec<(ContentStatus, u64)>> {
        let rows: Vec<StatusRow> = self
            .sql("SELECT status, count() AS total FROM contents GROUP BY status")
            .fetch()
            .await?;

        Ok(rows.into_iter().map(|row| (row.status, row.total)).collect())
    }

    async fn role_counts(&self) -> Result<Vec<(Role, u64)>> {
        let rows: Vec<RoleRow> = self
            .sql("SELECT author.role AS role FROM contents")
            .fetch()
            .await?;

        let mut counts: BTreeMap<Role, u64> = BTreeMap::new();
        for role in rows.into_iter().filter_map(|row| row.role) {
            *counts.entry(role).or_default() += 1;
        }

        Ok(counts.into_iter().collect())
    }
}
