//! Data model: entities, pages and the selection target

mod entity;
mod page;
mod target;

pub use entity::*;
pub use page::*;
pub use target::*;
