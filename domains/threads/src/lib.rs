//! Threads domain for Canvasforge
//!
//! Thin API layer over the assistant service: thread CRUD, message
//! submission with best-effort auto-naming, and the per-thread canvas
//! view produced by reducing the transcript's component artifacts.

pub mod api;

// Re-export domain types at the crate root for convenience
pub use api::routes::routes;
pub use api::ThreadsState;
