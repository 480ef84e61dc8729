//! Error types

mod fetch;
mod session;

pub use fetch::*;
pub use session::*;
