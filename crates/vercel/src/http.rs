//! Vercel REST API implementation
//!
//! Posts deployments to the v13 deployments endpoint using reqwest. The
//! provider's own error message is surfaced verbatim so the caller can show
//! it inline.

use reqwest::Client;
use serde::Deserialize;

use crate::{DeploymentOutcome, DeploymentRequest, VercelApi, VercelConfig, VercelError};

#[derive(Debug, Deserialize)]
struct DeploymentWire {
    /// Host of the deployment, without scheme
    url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorWire {
    error: ErrorBodyWire,
}

#[derive(Debug, Deserialize)]
struct ErrorBodyWire {
    message: String,
}

/// Vercel REST client
pub struct HttpVercelClient {
    client: Client,
    config: VercelConfig,
}

impl HttpVercelClient {
    pub fn new(config: VercelConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn deployments_url(&self) -> String {
        format!(
            "{}/v13/deployments",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl VercelApi for HttpVercelClient {
    async fn create_deployment(
        &self,
        token: &str,
        request: &DeploymentRequest,
    ) -> Result<DeploymentOutcome, VercelError> {
        tracing::debug!(name = %request.name, files = request.files.len(), "Creating Vercel deployment");

        let response = self
            .client
            .post(self.deployments_url())
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| VercelError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(VercelError::Auth(
                "Vercel rejected the access token".to_string(),
            ));
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            // Surface Vercel's own message when the body parses
            let message = match serde_json::from_str::<ErrorWire>(&error_body) {
                Ok(wire) => wire.error.message,
                Err(_) => format!("{}: {}", status, error_body),
            };

            return Err(VercelError::Rejected(message));
        }

        let wire: DeploymentWire = response
            .json()
            .await
            .map_err(|e| VercelError::Request(format!("Failed to parse response: {}", e)))?;

        Ok(DeploymentOutcome {
            url: format!("https://{}", wire.url),
        })
    }
}
