//! Authentication module for the session's bearer token.
//!
//! This module provides:
//! - `TokenManager`: Cached token with expiry tracking and authenticated requests
//! - `CachedCredential`: The token/expiry pair and JWT `exp` decoding
//! - `SignInProvider`: The host's interactive sign-in capability
//! - `AuthError`: Sign-in failures mapped from host error codes
//!
//! Tokens are held in memory only and stop being handed out 5 minutes
//! before they expire.

pub mod credential;
pub mod error;
pub mod manager;
pub mod sign_in;

pub use credential::CachedCredential;
pub use error::AuthError;
pub use manager::{RequestOptions, TokenManager};
pub use sign_in::{CallbackSignIn, Completion, HostError, SignInOptions, SignInProvider, SignInResult};
