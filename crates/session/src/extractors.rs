//! Axum extractor for visitor identity
//!
//! Generic over any state `S` where `SessionStore: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::SessionError;
use crate::store::SessionStore;

/// Header carrying the anonymous visitor id the client persists
pub const VISITOR_HEADER: &str = "x-visitor-id";

/// Identified visitor extractor.
///
/// Reads `x-visitor-id`, validates it as a UUID, and guarantees a vault
/// entry exists before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct Visitor {
    pub visitor_id: Uuid,
}

impl<S> FromRequestParts<S> for Visitor
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(VISITOR_HEADER)
            .ok_or(SessionError::MissingVisitor)?;
        let raw = header.to_str().map_err(|_| SessionError::InvalidVisitor)?;
        let visitor_id = Uuid::parse_str(raw).map_err(|_| SessionError::InvalidVisitor)?;

        let store = SessionStore::from_ref(state);
        store.ensure(visitor_id);

        Ok(Visitor { visitor_id })
    }
}
