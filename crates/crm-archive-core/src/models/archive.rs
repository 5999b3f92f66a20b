use std::fmt;

use serde::{Deserialize, Serialize};

/// How a free-text identifier names the target account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum IdentifierType {
    #[serde(rename = "domain")]
    Domain,
    #[serde(rename = "accountName")]
    AccountName,
}

/// Body for archiving against an account picked from search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArchiveToAccountRequest<'a> {
    pub message_id: &'a str,
    pub user_principal_name: &'a str,
    pub account_id: &'a str,
    pub account_name: &'a str,
}

/// Body for archiving against a typed domain or account name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArchiveByIdentifierRequest<'a> {
    pub message_id: &'a str,
    pub user_principal_name: &'a str,
    pub identifier_type: IdentifierType,
    pub identifier: &'a str,
}

/// What an archive attempt reports back to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ArchiveOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts", ts(type = "unknown"))]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts", ts(optional))]
    pub error: Option<String>,
}

impl ArchiveOutcome {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Fold any displayable error into a failed outcome.
    pub fn from_result<E: fmt::Display>(result: Result<serde_json::Value, E>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_type_wire_names() {
        assert_eq!(serde_json::to_value(IdentifierType::Domain).unwrap(), "domain");
        assert_eq!(serde_json::to_value(IdentifierType::AccountName).unwrap(), "accountName");
    }

    #[test]
    fn test_outcome_shapes() {
        let ok = serde_json::to_value(ArchiveOutcome::success(serde_json::json!({"id": 7}))).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": {"id": 7}}));

        let failed = serde_json::to_value(ArchiveOutcome::failure("No email item found")).unwrap();
        assert_eq!(failed, serde_json::json!({"success": false, "error": "No email item found"}));
    }

    #[test]
    fn test_identifier_request_body() {
        let body = serde_json::to_value(ArchiveByIdentifierRequest {
            message_id: "AAMk1",
            user_principal_name: "me@example.com",
            identifier_type: IdentifierType::Domain,
            identifier: "example.com",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "messageId": "AAMk1",
                "userPrincipalName": "me@example.com",
                "identifierType": "domain",
                "identifier": "example.com"
            })
        );
    }
}
