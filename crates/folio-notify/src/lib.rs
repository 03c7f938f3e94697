//! # folio-notify
//!
//! Process-wide queue of short-lived, user-facing messages.
//!
//! [`Broadcaster::publish`] appends a [`Notification`] to an ordered queue and
//! schedules its removal after a fixed visible duration (3 s by default).
//! The rendering layer subscribes to [`NotificationEvent`]s or polls
//! [`Broadcaster::visible`]. Nothing is persisted.

#![deny(unsafe_code)]

pub mod broadcaster;
pub mod types;

pub use broadcaster::Broadcaster;
pub use types::{Notification, NotificationEvent, NotificationKind, RemovalReason};
