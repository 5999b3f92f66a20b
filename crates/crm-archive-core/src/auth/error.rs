use thiserror::Error;

/// Known host sign-in failure codes and the message shown for each.
/// Codes not listed here fall through to a generic message carrying the raw code.
const HOST_ERROR_MESSAGES: &[(i64, &str)] = &[
    (13001, "No one is signed into Office. Please sign in and try again."),
    (13002, "User cancelled the consent prompt."),
    (13003, "User type is not supported. Contact your administrator."),
    (13004, "Resource not available. Try again later."),
    (13005, "SSO is not supported for this account type."),
    (13006, "Office on the web is experiencing issues. Close browser and restart."),
    (13007, "Add-in is not registered correctly. Contact your administrator."),
    (13008, "Office is still processing. Wait and try again."),
    (13009, "Platform does not support this version of Office.js."),
    (13010, "Browser zone configuration issue. Contact your administrator."),
    (13012, "Add-in running in unsupported context."),
];

/// Interactive token acquisition failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthError {
    /// Host error code, when the failure came from the host.
    pub code: Option<i64>,
    pub message: String,
}

impl AuthError {
    /// Map a host error code to a user-facing error.
    pub fn from_host(code: i64, host_message: &str) -> Self {
        let message = match Self::known_message(code) {
            Some(known) => known.to_string(),
            None => format!("Authentication error {}: {}", code, host_message),
        };
        Self {
            code: Some(code),
            message,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    fn known_message(code: i64) -> Option<&'static str> {
        HOST_ERROR_MESSAGES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, message)| *message)
    }
}
