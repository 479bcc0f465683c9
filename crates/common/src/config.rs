//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Conversation store provider ("openai" or "mock")
    pub assistant_provider: String,
    pub assistant_api_key: String,
    pub assistant_base_url: String,

    /// GitHub OAuth app credentials. Optional: without them the authorize
    /// endpoint reports NOT_CONFIGURED and only manual tokens work.
    pub github_client_id: Option<String>,
    pub github_client_secret: Option<String>,

    /// External API base URLs, overridable for local stubs
    pub github_api_base: String,
    pub github_oauth_base: String,
    pub vercel_api_base: String,

    /// Where the OAuth callback redirects the browser back to
    pub frontend_base_url: String,

    /// Runtime configuration
    pub log_level: String,
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            assistant_provider: env::var("ASSISTANT_PROVIDER")
                .unwrap_or_else(|_| "openai".to_string()),
            assistant_api_key: env::var("ASSISTANT_API_KEY")
                .map_err(|_| anyhow::anyhow!("ASSISTANT_API_KEY is required"))?,
            assistant_base_url: env::var("ASSISTANT_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),

            github_client_id: env::var("GITHUB_CLIENT_ID").ok(),
            github_client_secret: env::var("GITHUB_CLIENT_SECRET").ok(),

            github_api_base: env::var("GITHUB_API_BASE")
                .unwrap_or_else(|_| "https://api.github.com".to_string()),
            github_oauth_base: env::var("GITHUB_OAUTH_BASE")
                .unwrap_or_else(|_| "https://github.com/login/oauth".to_string()),
            vercel_api_base: env::var("VERCEL_API_BASE")
                .unwrap_or_else(|_| "https://api.vercel.com".to_string()),

            frontend_base_url: env::var("FRONTEND_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "canvasforge=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }

    /// True when the GitHub OAuth app is fully configured
    pub fn github_oauth_configured(&self) -> bool {
        self.github_client_id.is_some() && self.github_client_secret.is_some()
    }
}
