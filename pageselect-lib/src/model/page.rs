//! Page type for fetched table data.

use std::collections::HashSet;

use chrono::DateTime;
use chrono::Utc;

use super::Entity;

/// One fetched page of rows with the pagination metadata reported by the source.
///
/// A page is immutable once fetched. Loading another page replaces it wholesale.
///
/// # Example
///
/// ```
/// use pageselect_lib::model::{Entity, Page};
///
/// let page = Page::new(2, 12, 50, vec![Entity::new("13"), Entity::new("14")]);
/// assert_eq!(page.page_count(), 5);
/// assert!(page.has_next());
/// ```
#[derive(Debug, Clone)]
pub struct Page {
    entities: Vec<Entity>,
    /// 1-based page index that produced this page.
    index: usize,
    /// Page size the source honoured.
    page_size: usize,
    /// Total number of rows the source reported at fetch time.
    total_count: usize,
    fetched_at: DateTime<Utc>,
}

impl Page {
    /// Creates a page fetched now.
    pub fn new(index: usize, page_size: usize, total_count: usize, entities: Vec<Entity>) -> Self {
        Self {
            entities,
            index,
            page_size,
            total_count,
            fetched_at: Utc::now(),
        }
    }

    /// Returns the rows of this page in page order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns the 1-based page index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the page size the source honoured.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the total row count reported by the source.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns when this page was fetched.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns the identity keys of the rows on this page.
    pub fn visible_keys(&self) -> HashSet<&str> {
        self.entities.iter().map(Entity::identity_key).collect()
    }

    /// Returns `true` if a row with this key is on this page.
    pub fn contains(&self, key: &str) -> bool {
        self.entities.iter().any(|e| e.identity_key() == key)
    }

    /// Returns the number of pages the source reports.
    pub fn page_count(&self) -> usize {
        self.total_count.div_ceil(self.page_size.max(1))
    }

    /// Returns `true` if the source has rows after this page.
    ///
    /// A page with a zero page size never has a next page.
    pub fn has_next(&self) -> bool {
        self.page_size > 0 && self.index.saturating_mul(self.page_size) < self.total_count
    }

    /// Returns the 1-based position of this page's first row in the full dataset.
    pub fn first_row(&self) -> usize {
        self.index.saturating_sub(1) * self.page_size + 1
    }
}
