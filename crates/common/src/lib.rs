//! Shared utilities, configuration, and error handling for Canvasforge
//!
//! This crate provides common functionality used across the Canvasforge
//! application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Request extractors (validated JSON bodies, pagination)
//! - Project-name slugs and token fingerprints

pub mod config;
pub mod crypto;
pub mod error;
pub mod extractors;
pub mod slug;
pub mod state;

pub use config::Config;
pub use crypto::token_fingerprint;
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
pub use slug::{project_slug, DEFAULT_PROJECT_SLUG};
pub use state::StateError;
