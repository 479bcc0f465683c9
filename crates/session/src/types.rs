//! Session vault data types

use serde::{Deserialize, Serialize};

/// GitHub connection lifecycle of a visitor session.
///
/// Transitions are driven by the identity domain's state machine; the vault
/// only stores the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// A stored provider credential: the opaque bearer token plus whatever
/// profile data the provider returned at connect time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub access_token: String,
    pub login: Option<String>,
    pub avatar_url: Option<String>,
}

impl StoredCredential {
    /// A credential known only by its token; profile fields are filled in
    /// when the best-effort profile fetch succeeds.
    pub fn bare(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            login: None,
            avatar_url: None,
        }
    }
}

/// The sinks a visitor can drive. Each has an independent single-flight
/// guard: a second trigger of the *same* sink while one is in flight is
/// rejected, while different sinks may overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    Export,
    GithubPublish,
    VercelPublish,
}

impl Sink {
    /// Human label used in SINK_BUSY error messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Export => "Export",
            Self::GithubPublish => "GitHub publish",
            Self::VercelPublish => "Vercel publish",
        }
    }
}
