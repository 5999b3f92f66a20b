//! Data models for the CRM webhooks.
//!
//! - `Account`: A search result, passed through as the backend sent it
//! - `ArchiveOutcome`: The `{success, data | error}` result shown to the user
//! - `IdentifierType`: Whether a typed identifier is a domain or account name

pub mod account;
pub mod archive;

pub use account::Account;
pub(crate) use account::{SearchRequest, SearchResponse};
pub use archive::{ArchiveOutcome, IdentifierType};
pub(crate) use archive::{ArchiveByIdentifierRequest, ArchiveToAccountRequest};
