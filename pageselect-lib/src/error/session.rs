//! Pipeline and session errors

use super::FetchError;

/// Errors returned by the pipeline and the session driver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page cache was queried before any page was loaded.
    ///
    /// Callers must request page 1 at startup.
    #[error("no page has been loaded yet")]
    NotLoaded,

    /// A page index outside of the known page range was requested.
    #[error("page {index} is out of range (1..={page_count})")]
    InvalidPage {
        /// The requested index.
        index: usize,
        /// Number of pages reported by the last loaded page.
        page_count: usize,
    },

    /// A row edit referenced a row that is not on the visible page.
    #[error("row '{key}' is not on the visible page")]
    NotVisible {
        /// Identity key of the row.
        key: String,
    },

    /// Fetching a page failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
