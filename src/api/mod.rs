//! HTTP API layer for Blog Core.
//!
//! REST endpoints for posts, users, categories, subscribers, login,
//! notifications and the analytics dashboard.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
