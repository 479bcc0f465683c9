//! Mock Vercel Implementation
//!
//! Programmable mock for testing the deployment sink: canned URLs, a
//! recorded last request, and injectable failures.

use std::sync::{Arc, RwLock};

use crate::{DeploymentOutcome, DeploymentRequest, VercelApi, VercelError};

/// How the mock deployment should fail
#[derive(Debug, Clone, PartialEq)]
pub enum MockVercelFailure {
    /// The provider refuses the token (maps to `VercelError::Auth`)
    Unauthorized,
    /// The provider rejects the deployment with a message
    Rejected(String),
}

/// Programmable behavior for the mock Vercel client
#[derive(Debug, Default)]
pub struct MockVercelBehavior {
    pub failure: Arc<RwLock<Option<MockVercelFailure>>>,
}

impl MockVercelBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failure(&self, failure: MockVercelFailure) {
        *self.failure.write().unwrap() = Some(failure);
    }

    /// Reset to all-success behavior
    pub fn reset(&self) {
        *self.failure.write().unwrap() = None;
    }
}

/// Mock Vercel client with programmable behavior
#[derive(Debug, Clone, Default)]
pub struct MockVercelApi {
    behavior: Arc<MockVercelBehavior>,
    last_request: Arc<RwLock<Option<DeploymentRequest>>>,
}

impl MockVercelApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for programming behavior from tests
    pub fn behavior(&self) -> Arc<MockVercelBehavior> {
        self.behavior.clone()
    }

    /// The last deployment request, for assertions
    pub fn last_request(&self) -> Option<DeploymentRequest> {
        self.last_request.read().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl VercelApi for MockVercelApi {
    async fn create_deployment(
        &self,
        _token: &str,
        request: &DeploymentRequest,
    ) -> Result<DeploymentOutcome, VercelError> {
        *self.last_request.write().unwrap() = Some(request.clone());

        if let Some(failure) = self.behavior.failure.read().unwrap().clone() {
            return Err(match failure {
                MockVercelFailure::Unauthorized => {
                    VercelError::Auth("Vercel rejected the access token".to_string())
                }
                MockVercelFailure::Rejected(message) => VercelError::Rejected(message),
            });
        }

        Ok(DeploymentOutcome {
            url: format!("https://{}-mock.vercel.app", request.name),
        })
    }
}
