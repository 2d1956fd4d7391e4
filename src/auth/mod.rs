//! Authentication module
//!
//! Supports HTTP Basic and the LearnDash `Private-Token` header.
//!
//! The `Authenticator` encodes credentials once per run; every request
//! carries the same header set.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, PRIVATE_TOKEN_HEADER};
pub use types::AuthConfig;
