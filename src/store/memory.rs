use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;

use super::{ContentRepository, Result, ViewRepository};
use crate::model::{Author, Content, ContentStatus, ContentViews, DailyViews, Role, ViewTotals};
use crate::time::Day;

/// A store that keeps everything in process memory.
///
/// Counter updates go through the `dashmap` shard lock of their key, so an increment is atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    daily: DashMap<(String, Day), ViewTotals>,
    contents: DashMap<String, Content>,
    authors: DashMap<String, Author>,
}

impl MemoryStore {
    pub fn save_content(&self, content: Content) {
        self.inner.contents.insert(content.id.clone(), content);
    }

    pub fn save_author(&self, author: Author) {
        self.inner.authors.insert(author.id.clone(), author);
    }
}

impl ViewRepository for MemoryStore {
    async fn increment_daily(&self, content_id: &str, day: Day, unique: bool) -> Result<()> {
        self.inner
            .daily
            .entry((content_id.to_owned(), day))
            .or_default()
            .add(1, u64::from(unique));
        Ok(())
    }

    async fn daily_views(&self, content_id: &str, since: Day) -> Result<Vec<DailyViews>> {
        let mut rows: Vec<DailyViews> = self
            .inner
            .daily
            .iter()
            .filter(|entry| entry.key().0 == content_id && entry.key().1 >= since)
            .map(|entry| {
                let (content_id, day) = entry.key().clone();
                let totals = entry.value();
                DailyViews::new(content_id, day, totals.views, totals.unique_visitors)
            })
            .collect();

        rows.sort_by(|a, b| b.day.cmp(&a.day));
        Ok(rows)
    }

    async fn views_by_content(&self, since: Day) -> Result<Vec<ContentViews>> {
        let mut grouped: BTreeMap<String, ViewTotals> = BTreeMap::new();

        for entry in self.inner.daily.iter().filter(|entry| entry.key().1 >= since) {
            let totals = entry.value();
            grouped
                .entry(entry.key().0.clone())
                .or_default()
                .add(totals.views, totals.unique_visitors);
        }

        Ok(grouped
            .into_iter()
            .map(|(content_id, totals)| {
                ContentViews::new(content_id, totals.views, totals.unique_visitors)
            })
            .collect())
    }

    async fn total_views(&self, since: Option<Day>) -> Result<ViewTotals> {
        let mut totals = ViewTotals::default();

        for entry in self.inner.daily.iter() {
            if since.map_or(true, |since| entry.key().1 >= since) {
                totals.add(entry.value().views, entry.value().unique_visitors);
            }
        }

        Ok(totals)
    }
}

impl ContentRepository for MemoryStore {
    async fn content(&self, id: &str) -> Result<Option<Content>> {
        Ok(self.inner.contents.get(id).map(|entry| entry.value().clone()))
    }

    async fn author(&self, id: &str) -> Result<Option<Author>> {
        Ok(self.inner.authors.get(id).map(|entry| entry.value().clone()))
    }

    async fn status_counts(&self) -> Result<Vec<(ContentStatus, u64)>> {
        let mut counts: BTreeMap<ContentStatus, u64> = BTreeMap::new();

        for entry in self.inner.contents.iter() {
            *counts.entry(entry.value().status).or_default() += 1;
        }

        Ok(counts.into_iter().collect())
    }

    async fn role_counts(&self) -> Result<Vec<(Role, u64)>> {
        let mut counts: BTreeMap<Role, u64> = BTreeMap::new();

        for entry in self.inner.contents.iter() {
            let Some(author) = self.inner.authors.get(&entry.value().author_id) else {
                continue;
            };
            *counts.entry(author.role).or_default() += 1;
        }

        Ok(counts.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(input: &str) -> Day {
        input.parse().unwrap()
    }

    #[tokio::test]
    async fn increment_creates_then_updates_the_counter() {
        let store = MemoryStore::default();

        store.increment_daily("c1", day("2024-03-10"), true).await.unwrap();
        store.increment_daily("c1", day("2024-03-10"), false).await.unwrap();
        store.increment_daily("c1", day("2024-03-10"), true).await.unwrap();

        let rows = store.daily_views("c1", day("2024-03-01")).await.unwrap();
        assert_eq!(rows, vec![DailyViews::new("c1".into(), day("2024-03-10"), 3, 2)]);
    }

    #[tokio::test]
    async fn daily_views_are_filtered_and_newest_first() {
        let store = MemoryStore::default();

        for date in ["2024-03-01", "2024-03-05", "2024-03-03", "2024-02-20"] {
            store.increment_daily("c1", day(date), true).await.unwrap();
        }
        store.increment_daily("c2", day("2024-03-04"), true).await.unwrap();

        let days: Vec<String> = store
            .daily_views("c1", day("2024-03-01"))
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.day.to_string())
            .collect();

        assert_eq!(days, vec!["2024-03-05", "2024-03-03", "2024-03-01"]);
    }

    #[tokio::test]
    async fn views_are_grouped_by_content() {
        let store = MemoryStore::default();

        store.increment_daily("c1", day("2024-03-09"), true).await.unwrap();
        store.increment_daily("c1", day("2024-03-10"), true).await.unwrap();
        store.increment_daily("c1", day("2024-03-10"), false).await.unwrap();
        store.increment_daily("c2", day("2024-03-10"), true).await.unwrap();
        store.increment_daily("c3", day("2024-01-01"), true).await.unwrap();

        let grouped = store.views_by_content(day("2024-03-01")).await.unwrap();
        assert_eq!(
            grouped,
            vec![
                ContentViews::new("c1".into(), 3, 2),
                ContentViews::new("c2".into(), 1, 1),
            ]
        );

        let recent = store.total_views(Some(day("2024-03-01"))).await.unwrap();
        let all_time = store.total_views(None).await.unwrap();
        assert_eq!((recent.views, recent.unique_visitors), (4, 3));
        assert_eq!((all_time.views, all_time.unique_visitors), (5, 4));
    }

    #[tokio::test]
    async fn counts_content_by_status_and_author_role() {
        let store = MemoryStore::default();
        store.save_author(Author::new("a1".into(), "Ada".into(), "ada@example.com".into(), Role::Editor));
        store.save_author(Author::new("a2".into(), "Bo".into(), "bo@example.com".into(), Role::Author));

        let content = |id: &str, status, author: &str| {
            Content::new(id.into(), id.into(), id.into(), status, author.into(), String::new())
        };
        store.save_content(content("c1", ContentStatus::Published, "a1"));
        store.save_content(content("c2", ContentStatus::Published, "a2"));
        store.save_content(content("c3", ContentStatus::Draft, "a2"));
        store.save_content(content("c4", ContentStatus::Draft, "ghost"));

        assert_eq!(
            store.status_counts().await.unwrap(),
            vec![(ContentStatus::Draft, 2), (ContentStatus::Published, 2)]
        );
        assert_eq!(
            store.role_counts().await.unwrap(),
            vec![(Role::Editor, 1), (Role::Author, 2)]
        );
        assert_eq!(store.content("c4").await.unwrap().map(|c| c.author_id), Some("ghost".into()));
        assert_eq!(store.author("ghost").await.unwrap(), None);
    }
}
