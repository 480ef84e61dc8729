//! Paged data sources
//!
//! Provides the [`DataSource`] trait the session fetches pages through, an
//! in-memory implementation and an HTTP implementation for the Art
//! Institute of Chicago artworks API.

mod artic;
mod memory;

pub use artic::*;
pub use memory::*;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::Page;

/// A server-backed, paged dataset.
///
/// Implementations must report the total row count and the page size they
/// actually honoured, which may differ from the requested one.
///
/// # Example
///
/// ```ignore
/// use pageselect_lib::source::{DataSource, InMemorySource};
///
/// let source = InMemorySource::generated(50);
/// let page = source.fetch_page(2, 12).await?;
/// assert_eq!(page.entities()[0].identity_key(), "R13");
/// ```
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetches the page with the given 1-based index.
    async fn fetch_page(&self, page_index: usize, page_size: usize) -> Result<Page, FetchError>;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for Box<T> {
    async fn fetch_page(&self, page_index: usize, page_size: usize) -> Result<Page, FetchError> {
        (**self).fetch_page(page_index, page_size).await
    }
}
