//! # folio-core
//!
//! Shared vocabulary for the Folio client crates:
//!
//! - **Branded IDs**: [`NotificationId`], [`BookId`] as newtypes for type safety
//! - **Constants**: API prefix, durable token slot, notification lifetime
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` stderr subscriber

#![deny(unsafe_code)]

pub mod constants;
pub mod ids;
pub mod logging;

pub use ids::{BookId, NotificationId};
