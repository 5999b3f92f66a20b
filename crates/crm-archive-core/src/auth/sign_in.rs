//! The host's interactive sign-in capability.
//!
//! Hosts expose sign-in either as an async call or as a callback API.
//! `SignInProvider` is the async shape the token manager consumes;
//! `CallbackSignIn` adapts the callback shape onto it.

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::warn;

/// Options passed to the host when requesting a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignInOptions {
    pub allow_sign_in_prompt: bool,
    pub allow_consent_prompt: bool,
    /// Request a token for the add-in's own backend rather than a foreign resource.
    pub for_own_backend: bool,
}

impl SignInOptions {
    /// Interactive prompts allowed, token scoped to our own backend.
    pub fn interactive() -> Self {
        Self {
            allow_sign_in_prompt: true,
            allow_consent_prompt: true,
            for_own_backend: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInResult {
    Succeeded(String),
    Failed(HostError),
}

#[async_trait]
pub trait SignInProvider: Send + Sync {
    async fn acquire_token(&self, options: SignInOptions) -> SignInResult;
}

/// One-shot completion handed to a callback-style host API.
pub type Completion = Box<dyn FnOnce(SignInResult) + Send>;

/// Wraps a callback-style host sign-in function as a `SignInProvider`.
pub struct CallbackSignIn<F> {
    start: F,
}

impl<F> CallbackSignIn<F>
where
    F: Fn(SignInOptions, Completion) + Send + Sync,
{
    pub fn new(start: F) -> Self {
        Self { start }
    }
}

#[async_trait]
impl<F> SignInProvider for CallbackSignIn<F>
where
    F: Fn(SignInOptions, Completion) + Send + Sync,
{
    async fn acquire_token(&self, options: SignInOptions) -> SignInResult {
        let (tx, rx) = oneshot::channel();
        let completion: Completion = Box::new(move |result| {
            let _ = tx.send(result);
        });
        (self.start)(options, completion);

        match rx.await {
            Ok(result) => result,
            Err(_) => {
                warn!("Sign-in completion dropped without a result");
                SignInResult::Failed(HostError {
                    code: 0,
                    message: "sign-in callback was dropped".to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_callback_result_is_forwarded() {
        let provider = CallbackSignIn::new(|options: SignInOptions, done: Completion| {
            assert!(options.for_own_backend);
            done(SignInResult::Succeeded("abc".to_string()));
        });

        let result = provider.acquire_token(SignInOptions::interactive()).await;
        assert_eq!(result, SignInResult::Succeeded("abc".to_string()));
    }

    #[tokio::test]
    async fn test_callback_completed_from_another_task() {
        let provider = CallbackSignIn::new(|_options: SignInOptions, done: Completion| {
            tokio::spawn(async move {
                done(SignInResult::Failed(HostError {
                    code: 13002,
                    message: "cancelled".to_string(),
                }));
            });
        });

        match provider.acquire_token(SignInOptions::interactive()).await {
            SignInResult::Failed(err) => assert_eq!(err.code, 13002),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dropped_completion_fails_instead_of_hanging() {
        let provider = CallbackSignIn::new(|_options: SignInOptions, done: Completion| {
            drop(done);
        });

        match provider.acquire_token(SignInOptions::interactive()).await {
            SignInResult::Failed(err) => assert_eq!(err.code, 0),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
