//! Core entity definitions for the roadmap server.
//!
//! This crate defines the data types shared by the store, the auth layer and
//! the HTTP server: users, roadmaps, their milestone circles, likes, and the
//! color tags circles carry.

mod circle;
mod color;
mod like;
mod roadmap;
mod user;

pub use circle::*;
pub use color::*;
pub use like::*;
pub use roadmap::*;
pub use user::*;
