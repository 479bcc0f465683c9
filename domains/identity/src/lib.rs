//! Identity domain: visitor sessions, GitHub connection, deploy tokens

pub mod api;
pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::state::{ConnectionEvent, ConnectionState, ConnectionStateMachine, StateError};

// Re-export API types
pub use api::routes::routes;
pub use api::IdentityState;
