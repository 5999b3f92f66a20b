//! Client for the CRM webhooks.
//!
//! `CrmClient` builds the search and archive payloads from the mailbox
//! context and sends them through the session's `TokenManager`.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::auth::{RequestOptions, TokenManager};
use crate::mailbox::MailboxContext;
use crate::models::{
    Account, ArchiveByIdentifierRequest, ArchiveOutcome, ArchiveToAccountRequest, IdentifierType,
    SearchRequest, SearchResponse,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

const SEARCH_ENDPOINT: &str = "/search_accounts";

const ARCHIVE_ENDPOINT: &str = "/archive_sugarcrm";

/// Queries shorter than this return no results without hitting the backend.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Clone is cheap - both halves are shared.
#[derive(Clone)]
pub struct CrmClient {
    tokens: Arc<TokenManager>,
    mailbox: Arc<dyn MailboxContext>,
}

impl CrmClient {
    pub fn new(tokens: Arc<TokenManager>, mailbox: Arc<dyn MailboxContext>) -> Self {
        Self { tokens, mailbox }
    }

    /// Search CRM accounts by name for the typeahead.
    pub async fn search_accounts(&self, query: &str) -> Result<Vec<Account>, ApiError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Ok(vec![]);
        }

        let user_email = self
            .mailbox
            .user_email()
            .ok_or_else(|| ApiError::validation("Unable to get user email address"))?;

        let body = to_body(&SearchRequest {
            query,
            user_email: &user_email,
        })?;

        let response = self
            .tokens
            .authenticated_request(SEARCH_ENDPOINT, &RequestOptions::post_json(body))
            .await?;
        let response = ApiError::check_response(response).await?;

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("search results: {}", e)))?;

        debug!(count = parsed.results.len(), "Search results received");
        Ok(parsed.results)
    }

    /// Archive the open message against an account picked from search.
    pub async fn archive_to_account(&self, account: &Account) -> ArchiveOutcome {
        let result = self.try_archive_to_account(account).await;
        Self::outcome(result)
    }

    /// Archive the open message against a typed domain or account name.
    pub async fn archive_by_identifier(
        &self,
        identifier: &str,
        identifier_type: IdentifierType,
    ) -> ArchiveOutcome {
        let result = self.try_archive_by_identifier(identifier, identifier_type).await;
        Self::outcome(result)
    }

    async fn try_archive_to_account(&self, account: &Account) -> Result<serde_json::Value, ApiError> {
        if account.id.trim().is_empty() {
            return Err(ApiError::validation("Please select an account"));
        }
        let (message_id, user_email) = self.message_context()?;

        let body = to_body(&ArchiveToAccountRequest {
            message_id: &message_id,
            user_principal_name: &user_email,
            account_id: &account.id,
            account_name: &account.name,
        })?;
        self.post_archive(body).await
    }

    async fn try_archive_by_identifier(
        &self,
        identifier: &str,
        identifier_type: IdentifierType,
    ) -> Result<serde_json::Value, ApiError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ApiError::validation("Please enter a value"));
        }
        let (message_id, user_email) = self.message_context()?;

        let body = to_body(&ArchiveByIdentifierRequest {
            message_id: &message_id,
            user_principal_name: &user_email,
            identifier_type,
            identifier,
        })?;
        self.post_archive(body).await
    }

    /// Message id and user email, or the validation error explaining which is missing.
    fn message_context(&self) -> Result<(String, String), ApiError> {
        if !self.mailbox.has_item() {
            return Err(ApiError::validation("No email item found"));
        }
        let message_id = self
            .mailbox
            .message_id()
            .ok_or_else(|| ApiError::validation("Unable to get message ID"))?;
        let user_email = self
            .mailbox
            .user_email()
            .ok_or_else(|| ApiError::validation("Unable to get user email address"))?;
        Ok((message_id, user_email))
    }

    async fn post_archive(&self, body: serde_json::Value) -> Result<serde_json::Value, ApiError> {
        let response = self
            .tokens
            .authenticated_request(ARCHIVE_ENDPOINT, &RequestOptions::post_json(body))
            .await?;
        let response = ApiError::check_response(response).await?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("archive response: {}", e)))
    }

    fn outcome(result: Result<serde_json::Value, ApiError>) -> ArchiveOutcome {
        match &result {
            Ok(_) => info!("Email archived"),
            Err(e) => error!(error = %e, "Archive failed"),
        }
        ArchiveOutcome::from_result(result)
    }
}

fn to_body<T: Serialize>(request: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(request)
        .map_err(|e| ApiError::validation(format!("Failed to encode request: {}", e)))
}
