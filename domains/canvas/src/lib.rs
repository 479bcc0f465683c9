//! Canvas domain: component registry, artifact reduction

pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::reducer::{reduce, transcript, Artifact, CanvasSet};
pub use domain::registry::{ComponentKind, PropsError};
