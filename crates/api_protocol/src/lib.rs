//! HTTP API definitions for the roadmap server.
//!
//! Request and response bodies shared by the server and its clients. Every
//! endpoint takes and returns JSON.

pub mod error;
pub mod requests;
pub mod responses;
mod types;

pub use error::*;
pub use types::*;
