//! Projects domain for Canvasforge
//!
//! Turns a thread's reduced canvas into a standalone Vite React project and
//! drives the three delivery sinks: zip export, GitHub repository publish,
//! and Vercel deployment. Each sink is single-flight per visitor.

pub mod api;
pub mod domain;

// Re-export domain types at the crate root for convenience
pub use api::routes::routes;
pub use api::ProjectsState;
pub use domain::archive::build_archive;
pub use domain::materializer::{materialize, FileTree, MaterializeError};
