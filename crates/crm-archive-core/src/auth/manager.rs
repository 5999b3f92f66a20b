use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use tracing::{debug, info, warn};

use super::credential::{now_ms, CachedCredential};
use super::sign_in::{SignInOptions, SignInProvider, SignInResult};
use super::AuthError;
use crate::api::ApiError;
use crate::config::Config;

/// A request to send under the session's bearer token.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::POST,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn post_json(body: serde_json::Value) -> Self {
        Self {
            body: Some(body),
            ..Default::default()
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Owns the session's bearer token and sends authenticated requests.
///
/// Create one per session and share it behind an `Arc`. Concurrent callers
/// that miss the cache wait on a single sign-in rather than each prompting.
pub struct TokenManager {
    client: Client,
    base_url: String,
    sign_in: Arc<dyn SignInProvider>,
    credential: Mutex<CachedCredential>,
    acquiring: tokio::sync::Mutex<()>,
}

impl TokenManager {
    pub fn new(client: Client, base_url: impl Into<String>, sign_in: Arc<dyn SignInProvider>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            sign_in,
            credential: Mutex::new(CachedCredential::new()),
            acquiring: tokio::sync::Mutex::new(()),
        }
    }

    /// Build a manager with an HTTP client configured from `config`.
    pub fn from_config(config: &Config, sign_in: Arc<dyn SignInProvider>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::new(client, config.base_url(), sign_in))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn credential(&self) -> MutexGuard<'_, CachedCredential> {
        self.credential.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True if a token is cached and won't expire within the refresh buffer.
    pub fn is_usable(&self) -> bool {
        self.credential().is_usable_at(now_ms())
    }

    pub fn expires_at_ms(&self) -> Option<i64> {
        self.credential().expires_at_ms()
    }

    fn cached_token(&self) -> Option<String> {
        self.credential().usable_token(now_ms()).map(str::to_string)
    }

    /// Return a usable bearer token, signing in through the host if needed.
    pub async fn get_token(&self) -> Result<String, AuthError> {
        if let Some(token) = self.cached_token() {
            debug!("Using cached token");
            return Ok(token);
        }

        let _guard = self.acquiring.lock().await;

        // Another caller may have finished signing in while we waited
        if let Some(token) = self.cached_token() {
            debug!("Token acquired by concurrent caller");
            return Ok(token);
        }

        debug!("Requesting token from host");
        match self.sign_in.acquire_token(SignInOptions::interactive()).await {
            SignInResult::Succeeded(token) => {
                let mut credential = self.credential();
                credential.store(token.clone(), now_ms());
                info!(expires_at_ms = ?credential.expires_at_ms(), "Signed in");
                Ok(token)
            }
            SignInResult::Failed(err) => {
                let err = AuthError::from_host(err.code, &err.message);
                warn!(code = ?err.code, error = %err, "Sign-in failed");
                Err(err)
            }
        }
    }

    /// Drop the cached token so the next `get_token` signs in again.
    pub fn logout(&self) {
        self.credential().clear();
    }

    /// Send a request to `base_url + endpoint_path` with the session token.
    ///
    /// A 401 clears the token, signs in again and resends the request once.
    /// Whatever the retry returns is handed back as-is; other statuses are
    /// never interpreted here.
    pub async fn authenticated_request(
        &self,
        endpoint_path: &str,
        options: &RequestOptions,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint_path);

        let token = self.get_token().await?;
        let response = self.send(&url, options, &token).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        warn!(url = %url, "Request unauthorized, signing in again and retrying once");
        self.logout();
        let token = self.get_token().await?;
        self.send(&url, options, &token).await
    }

    async fn send(&self, url: &str, options: &RequestOptions, token: &str) -> Result<Response, ApiError> {
        let mut headers = options.headers.clone();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AuthError::other("Token contains characters not valid in a header"))?;
        headers.insert(header::AUTHORIZATION, bearer);

        let mut request = self
            .client
            .request(options.method.clone(), url)
            .headers(headers);
        if let Some(ref body) = options.body {
            request = request.body(body.to_string());
        }

        let response = request.send().await?;
        debug!(url = url, status = %response.status(), "Response received");
        Ok(response)
    }
}
