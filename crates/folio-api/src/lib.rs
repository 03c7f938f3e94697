//! # folio-api
//!
//! Client layer for the external Folio API service.
//!
//! - [`ApiClient`]: the single choke point for HTTP calls. Attaches the
//!   bearer token, decodes bodies, and normalizes every outcome into an
//!   [`ApiResponse`]. Never returns an error past its boundary.
//! - [`Session`]: login/logout and the "call, notify on failure" pattern
//!   used by every view.
//! - [`books`], [`favorites`], [`billing`], [`account`]: typed resource calls.
//! - [`paywall`]: how much of a book's text the current plan may see.
//!
//! # Status-code contract
//!
//! | status | meaning                  | token store            |
//! |--------|--------------------------|------------------------|
//! | 2xx    | success                  | untouched              |
//! | 0      | no response (transport)  | untouched              |
//! | 401    | authentication failure   | **cleared by gateway** |
//! | 403    | entitlement/limit failure| untouched              |
//! | other  | generic failure          | untouched              |

#![deny(unsafe_code)]

pub mod account;
pub mod billing;
pub mod books;
pub mod client;
pub mod errors;
pub mod favorites;
pub mod models;
pub mod paywall;
pub mod response;
pub mod session;

pub use client::ApiClient;
pub use errors::{ApiError, FailureKind};
pub use models::{BillingLink, Book, BookDetail, BookSummary, Plan, User};
pub use paywall::Access;
pub use response::{ApiResponse, NETWORK_ERROR_MESSAGE};
pub use session::{Followup, Session};

pub use reqwest::Method;
