//! Auth configuration types

use serde::{Deserialize, Serialize};

/// Credentials accepted by a LearnDash site
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// HTTP Basic authentication (WordPress application passwords)
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// `Private-Token` header authentication
    PrivateToken {
        /// The token value
        token: String,
    },
}

impl AuthConfig {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            AuthConfig::Basic { .. } => "basic",
            AuthConfig::PrivateToken { .. } => "private_token",
        }
    }
}

// Secrets stay out of logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            AuthConfig::PrivateToken { .. } => f
                .debug_struct("PrivateToken")
                .field("token", &"***")
                .finish(),
        }
    }
}
