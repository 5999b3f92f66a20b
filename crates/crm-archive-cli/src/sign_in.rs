//! Terminal stand-in for the host's sign-in prompt.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use crm_archive_core::auth::{HostError, SignInOptions, SignInProvider, SignInResult};
use tracing::debug;

/// Environment variable holding a pre-issued bearer token
pub const TOKEN_ENV: &str = "CRM_ARCHIVE_TOKEN";

/// Host code reported when nobody is available to sign in
const NO_SIGNED_IN_USER: i64 = 13001;

/// Host code reported when the user dismisses the prompt
const USER_CANCELLED: i64 = 13002;

/// Hands out the token from `CRM_ARCHIVE_TOKEN` once, then prompts on the terminal.
pub struct TerminalSignIn {
    env_token: Option<String>,
    env_token_used: AtomicBool,
}

impl TerminalSignIn {
    pub fn from_env() -> Self {
        Self::new(std::env::var(TOKEN_ENV).ok())
    }

    pub fn new(env_token: Option<String>) -> Self {
        Self {
            env_token: env_token
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            env_token_used: AtomicBool::new(false),
        }
    }

    fn take_env_token(&self) -> Option<String> {
        let token = self.env_token.as_ref()?;
        if self.env_token_used.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(token.clone())
        }
    }
}

fn failed(code: i64, message: impl Into<String>) -> SignInResult {
    SignInResult::Failed(HostError {
        code,
        message: message.into(),
    })
}

#[async_trait]
impl SignInProvider for TerminalSignIn {
    async fn acquire_token(&self, options: SignInOptions) -> SignInResult {
        if let Some(token) = self.take_env_token() {
            debug!("Using token from {}", TOKEN_ENV);
            return SignInResult::Succeeded(token);
        }

        if !options.allow_sign_in_prompt {
            return failed(NO_SIGNED_IN_USER, "sign-in prompt not allowed");
        }

        let prompt = tokio::task::spawn_blocking(|| rpassword::prompt_password("Bearer token: ")).await;
        match prompt {
            Ok(Ok(token)) if !token.trim().is_empty() => SignInResult::Succeeded(token.trim().to_string()),
            Ok(Ok(_)) => failed(USER_CANCELLED, "no token entered"),
            Ok(Err(e)) => failed(0, format!("could not read token: {}", e)),
            Err(e) => failed(0, format!("sign-in prompt failed: {}", e)),
        }
    }
}
