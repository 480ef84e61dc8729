//! In-memory data source

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::DataSource;
use crate::error::FetchError;
use crate::model::Entity;
use crate::model::Page;

/// A data source serving pages from a fixed list of rows.
///
/// Useful offline and as a test double: it can simulate latency, fail
/// selected pages, and records every page index it was asked for.
///
/// # Example
///
/// ```
/// use pageselect_lib::source::InMemorySource;
///
/// let source = InMemorySource::generated(50).failing_on([3]);
/// assert_eq!(source.len(), 50);
/// ```
#[derive(Debug, Default)]
pub struct InMemorySource {
    rows: Vec<Entity>,
    latency: Option<Duration>,
    failing: HashSet<usize>,
    fetched: Mutex<Vec<usize>>,
}

impl InMemorySource {
    /// Creates a source serving `rows` in order.
    pub fn new(rows: Vec<Entity>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Creates a source with `count` rows keyed `R1..=R{count}`.
    pub fn generated(count: usize) -> Self {
        let rows = (1..=count)
            .map(|n| {
                Entity::new(format!("R{n}"))
                    .with_field("title", format!("Artwork {n}"))
                    .with_field("place_of_origin", "Nowhere")
                    .with_field("date_start", 1800 + (n % 200) as i64)
            })
            .collect();
        Self::new(rows)
    }

    /// Delays every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes fetches of the given page indices fail with HTTP 503.
    pub fn failing_on(mut self, pages: impl IntoIterator<Item = usize>) -> Self {
        self.failing.extend(pages);
        self
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the page indices fetched so far, in call order.
    pub async fn fetched(&self) -> Vec<usize> {
        self.fetched.lock().await.clone()
    }
}

#[async_trait]
impl DataSource for InMemorySource {
    async fn fetch_page(&self, page_index: usize, page_size: usize) -> Result<Page, FetchError> {
        self.fetched.lock().await.push(page_index);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if page_index == 0 || page_size == 0 {
            return Err(FetchError::http(400, "page and limit must be positive"));
        }
        if self.failing.contains(&page_index) {
            return Err(FetchError::http(503, format!("page {} unavailable", page_index)));
        }

        let start = (page_index - 1).saturating_mul(page_size).min(self.rows.len());
        let end = start.saturating_add(page_size).min(self.rows.len());
        Ok(Page::new(
            page_index,
            page_size,
            self.rows.len(),
            self.rows[start..end].to_vec(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pages() {
        let source = InMemorySource::generated(50);

        let page = source.fetch_page(2, 12).await.unwrap();
        assert_eq!(page.len(), 12);
        assert_eq!(page.entities()[0].identity_key(), "R13");
        assert_eq!(page.total_count(), 50);

        let last = source.fetch_page(5, 12).await.unwrap();
        assert_eq!(last.len(), 2);
        assert!(!last.has_next());

        let beyond = source.fetch_page(9, 12).await.unwrap();
        assert!(beyond.is_empty());

        assert_eq!(source.fetched().await, vec![2, 5, 9]);
    }

    #[tokio::test]
    async fn test_failures() {
        let source = InMemorySource::generated(10).failing_on([2]);
        let err = source.fetch_page(2, 5).await.unwrap_err();
        assert_eq!(err.status_code(), Some(503));

        let err = source.fetch_page(0, 5).await.unwrap_err();
        assert_eq!(err.status_code(), Some(400));
    }
}
