//! Domain types for Blog Core.
//!
//! This module contains the core business entities and value objects.

mod category;
mod post;
mod report;
mod subscriber;
mod user;

pub use category::*;
pub use post::*;
pub use report::*;
pub use subscriber::*;
pub use user::*;
