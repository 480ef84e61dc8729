//! Cross-page row selection for paginated, server-backed tables.
//!
//! Keeps a user's row selection consistent while the visible page of data is
//! replaced underneath it, and can auto-complete a target selection size by
//! consuming rows from pages fetched lazily from a [`source::DataSource`].

pub mod autofill;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod selection;
pub mod source;
pub mod surface;

mod session;

pub use config::*;
pub use session::*;
