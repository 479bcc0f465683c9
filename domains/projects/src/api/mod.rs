//! API layer for the projects domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::ProjectsState;
