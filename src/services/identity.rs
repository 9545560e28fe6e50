//! School identity provider integration
//!
//! This service verifies login credentials against the school's central
//! identity provider over HTTPS, including HTTP client setup, response
//! parsing and error handling. Accounts are provisioned by administrators;
//! the provider only vouches for credentials.

use crate::config::settings::Settings;
use crate::utils::errors::{IdentityError, Result, SixkulError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Identity provider response structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityResponse {
    pub ok: bool,
    pub result: Option<IdentityResult>,
}

/// Verified identity returned by the provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityResult {
    pub external_id: String,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Identity provider client
#[derive(Debug, Clone)]
pub struct IdentityService {
    client: Client,
    settings: Settings,
}

impl IdentityService {
    /// Create a new IdentityService instance
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.auth.provider_timeout_seconds))
            .user_agent("SIXKUL/1.0")
            .build()
            .map_err(SixkulError::Http)?;

        Ok(Self { client, settings })
    }

    /// Verify a username/password pair against the identity provider.
    ///
    /// Returns the verified identity on success. Wrong credentials map to
    /// `IdentityError::InvalidCredentials`, provider outages to the
    /// transport-level variants.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IdentityResult> {
        let url = format!("{}/api/v1/verify", self.settings.auth.provider_url);

        debug!(username = username, "Verifying credentials against identity provider");

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.settings.auth.provider_api_key)
            .json(&VerifyRequest { username, password })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SixkulError::Identity(IdentityError::Timeout)
                } else if e.is_connect() {
                    SixkulError::Identity(IdentityError::ServiceUnavailable)
                } else {
                    SixkulError::Identity(IdentityError::RequestFailed(e.to_string()))
                }
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            debug!(username = username, "Identity provider rejected credentials");
            return Err(SixkulError::Identity(IdentityError::InvalidCredentials));
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, "Identity provider request failed");
            return Err(SixkulError::Identity(IdentityError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            ))));
        }

        let identity_response: IdentityResponse = response
            .json()
            .await
            .map_err(|e| SixkulError::Identity(IdentityError::InvalidResponse(e.to_string())))?;

        if !identity_response.ok {
            return Err(SixkulError::Identity(IdentityError::InvalidCredentials));
        }

        let result = identity_response.result.ok_or_else(|| {
            SixkulError::Identity(IdentityError::InvalidResponse(
                "provider returned ok without a result".to_string(),
            ))
        })?;

        debug!(external_id = %result.external_id, "Credentials verified");
        Ok(result)
    }

    /// Check whether the provider answers its health endpoint
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/v1/health", self.settings.auth.provider_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Identity provider health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_provider_is_unhealthy() {
        let mut settings = Settings::default();
        settings.auth.provider_url = "http://127.0.0.1:1".to_string();
        settings.auth.provider_timeout_seconds = 1;

        let service = IdentityService::new(settings).unwrap();
        assert!(!tokio_test::block_on(service.health_check()));
    }
}
