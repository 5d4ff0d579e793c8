//! Authentication module for Blog Core.
//!
//! Users log in with a username and password and receive an HS256 JWT.
//! Administrative routes require a bearer token carrying the admin role;
//! self-service profile edits require the account's own token.

mod jwt;
mod middleware;

pub use jwt::*;
pub use middleware::*;
