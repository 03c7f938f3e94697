//! # folio-auth
//!
//! Session token storage for the Folio client.
//!
//! The store holds at most one opaque bearer token and is the single source
//! of truth for "is a user logged in". Collaborators receive it as an
//! `Arc<dyn TokenStore>`:
//! - [`FileTokenStore`]: plain-text file with 0o600 permissions, survives restarts
//! - [`MemoryTokenStore`]: in-process fake for tests and throwaway sessions
//!
//! # Example
//!
//! ```no_run
//! use folio_auth::{FileTokenStore, TokenStore};
//!
//! let store = FileTokenStore::new("/home/user/.folio/token");
//! store.set("tok-123");
//! assert!(store.get().is_some());
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod store;

pub use errors::AuthError;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
