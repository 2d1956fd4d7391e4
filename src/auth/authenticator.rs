//! Authenticator implementation
//!
//! Credentials never change during a run, so the header set is computed
//! once at construction and handed out by reference for every request.

use super::types::AuthConfig;
use crate::error::{Error, Result};
use base64::Engine;

/// Header carrying a LearnDash private token
pub const PRIVATE_TOKEN_HEADER: &str = "Private-Token";

/// Produces the static request headers for a run
#[derive(Clone)]
pub struct Authenticator {
    config: AuthConfig,
    headers: Vec<(String, String)>,
}

impl Authenticator {
    /// Build an authenticator, encoding credentials up front
    pub fn new(config: AuthConfig, user_agent: Option<&str>) -> Result<Self> {
        let mut headers = Vec::with_capacity(2);

        match &config {
            AuthConfig::Basic { username, password } => {
                if username.is_empty() {
                    return Err(Error::auth("Basic auth requires a non-empty username"));
                }
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{username}:{password}"));
                headers.push(("Authorization".to_string(), format!("Basic {encoded}")));
            }
            AuthConfig::PrivateToken { token } => {
                if token.is_empty() {
                    return Err(Error::auth("Private token must not be empty"));
                }
                headers.push((PRIVATE_TOKEN_HEADER.to_string(), token.clone()));
            }
        }

        if let Some(agent) = user_agent.filter(|a| !a.trim().is_empty()) {
            headers.push(("User-Agent".to_string(), agent.to_string()));
        }

        Ok(Self { config, headers })
    }

    /// Headers attached to every request
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Get the auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .field("headers", &names)
            .finish()
    }
}
