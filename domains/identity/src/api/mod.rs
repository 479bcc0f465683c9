//! API layer for the Identity domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::IdentityState;
