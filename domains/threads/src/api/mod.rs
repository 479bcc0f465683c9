//! API layer for the threads domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::ThreadsState;
