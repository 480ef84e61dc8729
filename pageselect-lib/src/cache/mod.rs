//! Page cache
//!
//! Holds the single resident page. Decouples when a page was fetched from when
//! its rows are reconciled against the selection.

use crate::error::Error;
use crate::model::Page;

/// The most recently loaded page.
///
/// Only one page is resident at a time; loading a page replaces the previous
/// one wholesale.
#[derive(Debug, Default)]
pub struct PageCache {
    page: Option<Page>,
    loads: u64,
}

impl PageCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the resident page, returning the previous one.
    pub fn load(&mut self, page: Page) -> Option<Page> {
        self.loads += 1;
        self.page.replace(page)
    }

    /// Returns the resident page.
    ///
    /// Fails with [`Error::NotLoaded`] until the first page has been loaded.
    pub fn current(&self) -> Result<&Page, Error> {
        self.page.as_ref().ok_or(Error::NotLoaded)
    }

    /// Returns the index of the resident page, if any.
    pub fn index(&self) -> Option<usize> {
        self.page.as_ref().map(Page::index)
    }

    /// Returns the number of pages loaded over the cache's lifetime.
    pub fn loads(&self) -> u64 {
        self.loads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entity;

    #[test]
    fn test_not_loaded() {
        let cache = PageCache::new();
        assert!(matches!(cache.current(), Err(Error::NotLoaded)));
        assert_eq!(cache.index(), None);
    }

    #[test]
    fn test_load_replaces() {
        let mut cache = PageCache::new();
        assert!(cache.load(Page::new(1, 2, 4, vec![Entity::new("a"), Entity::new("b")])).is_none());

        let previous = cache.load(Page::new(2, 2, 4, vec![Entity::new("c"), Entity::new("d")]));
        assert_eq!(previous.map(|p| p.index()), Some(1));
        assert_eq!(cache.current().unwrap().index(), 2);
        assert_eq!(cache.loads(), 2);
    }
}
