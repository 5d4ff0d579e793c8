//! Storage layer for Blog Core.
//!
//! Provides database access via SQLx with SQLite.

mod models;
mod repository;

pub use repository::BlogRepository;

#[cfg(test)]
pub(crate) use repository::tests as test_support;
