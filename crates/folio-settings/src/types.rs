//! Settings types.
//!
//! Field names are camelCase on disk.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings object.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FolioSettings {
    /// Remote API endpoint settings.
    pub api: ApiSettings,
    /// Session token storage.
    pub session: SessionSettings,
    /// Transient notification behavior.
    pub notifications: NotificationSettings,
    /// Log output.
    pub logging: LoggingSettings,
}

/// Where and how to reach the external API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Scheme + host (+ optional port) of the API service.
    pub base_url: String,
    /// Path prefix prepended to every resource path.
    pub path_prefix: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            path_prefix: folio_core::constants::API_PREFIX.to_string(),
            timeout_ms: 15_000,
        }
    }
}

/// Durable session token location.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// File holding the bearer token as plain text.
    pub token_file: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            token_file: folio_core::constants::data_dir().join(folio_core::constants::TOKEN_SLOT),
        }
    }
}

/// Notification banner settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    /// Visible duration before automatic removal.
    pub ttl_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            ttl_ms: folio_core::constants::NOTIFICATION_TTL_MS,
        }
    }
}

/// Log output settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
