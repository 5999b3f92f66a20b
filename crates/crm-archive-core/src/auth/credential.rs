use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

/// Buffer before expiry during which a token is no longer handed out (5 minutes)
pub const TOKEN_REFRESH_BUFFER_MS: i64 = 5 * 60 * 1000;

/// Assumed token lifetime when the expiry claim can't be read (1 hour)
pub const FALLBACK_LIFETIME_MS: i64 = 60 * 60 * 1000;

/// Latest `exp` accepted from a token, in seconds (end of year 9999)
const MAX_EXP_SECS: f64 = 253_402_300_799.0;

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<f64>,
}

/// The bearer token for this session and when it expires.
///
/// Token and expiry are stored together, so one can never be present
/// without the other.
#[derive(Debug, Clone, Default)]
pub struct CachedCredential {
    inner: Option<(String, i64)>,
}

impl CachedCredential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly acquired token, deriving its expiry from the `exp` claim.
    pub fn store(&mut self, token: String, now_ms: i64) {
        let expires_at_ms = expiry_from_token(&token).unwrap_or_else(|| {
            warn!("Could not read token expiry, assuming one hour");
            now_ms + FALLBACK_LIFETIME_MS
        });
        self.inner = Some((token, expires_at_ms));
    }

    pub fn clear(&mut self) {
        self.inner = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.inner.as_ref().map(|(token, _)| token.as_str())
    }

    pub fn expires_at_ms(&self) -> Option<i64> {
        self.inner.as_ref().map(|(_, expires_at)| *expires_at)
    }

    /// True if present and more than the refresh buffer away from expiry.
    pub fn is_usable_at(&self, now_ms: i64) -> bool {
        self.expires_at_ms()
            .map(|expires_at| now_ms < expires_at.saturating_sub(TOKEN_REFRESH_BUFFER_MS))
            .unwrap_or(false)
    }

    /// The token, if it is usable at `now_ms`.
    pub fn usable_token(&self, now_ms: i64) -> Option<&str> {
        if self.is_usable_at(now_ms) {
            self.token()
        } else {
            None
        }
    }
}

/// Read the `exp` claim (seconds) from a JWT's payload segment, in milliseconds.
pub fn expiry_from_token(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = decode_segment(payload)?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.exp?;
    if !exp.is_finite() || exp <= 0.0 || exp > MAX_EXP_SECS {
        return None;
    }
    Some((exp * 1000.0) as i64)
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    [&URL_SAFE_NO_PAD, &URL_SAFE, &STANDARD_NO_PAD, &STANDARD]
        .iter()
        .find_map(|engine| engine.decode(segment).ok())
}
