//! Core library for crm-archive.
//!
//! Archives the email a user has open into the CRM through the webhook
//! backend. The interesting part is [`auth::TokenManager`], which caches the
//! host-issued bearer token, signs in again when it is close to expiry, and
//! retries a request once when the backend answers 401.

pub mod api;
pub mod auth;
pub mod config;
pub mod mailbox;
pub mod models;

pub use api::{ApiError, CrmClient};
pub use auth::{AuthError, SignInProvider, TokenManager};
pub use config::Config;
pub use mailbox::{MailboxContext, StaticMailbox};
pub use models::{Account, ArchiveOutcome, IdentifierType};
