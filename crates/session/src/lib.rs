//! Visitor session vault for Canvasforge
//!
//! Canvasforge has no user accounts: the browser persists an anonymous
//! visitor id and sends it as the `x-visitor-id` header. This crate owns the
//! in-memory vault those ids resolve to (provider credentials, connection
//! state, pending OAuth handshakes, sink single-flight flags) and the axum
//! extractor that resolves the header, generic over any state exposing the
//! vault via `FromRef`.

mod error;
mod extractors;
mod store;
mod types;

pub use error::SessionError;
pub use extractors::{Visitor, VISITOR_HEADER};
pub use store::{SessionStore, SinkGuard};
pub use types::{ConnectionState, Sink, StoredCredential};
