//! Client for the CRM webhook backend.
//!
//! This module provides the `CrmClient` for searching accounts and archiving
//! the open email. All requests go through the session's `TokenManager`, so
//! they carry the bearer token and get one re-authentication retry on 401.

pub mod client;
pub mod error;

pub use client::{CrmClient, MIN_SEARCH_QUERY_LEN};
pub use error::ApiError;
