//! Storage for users, roadmaps, circles and likes.
//!
//! This crate provides the persistence boundary of the roadmap server. It
//! supports an in-memory backend (tests and local runs) and SQLite.

mod error;
mod memory;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;
