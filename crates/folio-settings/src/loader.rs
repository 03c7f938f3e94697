//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`FolioSettings::default()`]
//! 2. If `~/.folio/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `FOLIO_*` environment variable overrides (highest priority)

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::{ApiSettings, FolioSettings, NotificationSettings};

/// Accepted request timeout, in milliseconds.
pub const TIMEOUT_MS_RANGE: RangeInclusive<u64> = 1_000..=300_000;

/// Accepted notification lifetime, in milliseconds.
pub const TTL_MS_RANGE: RangeInclusive<u64> = 100..=60_000;

/// Resolve the path to the settings file (`~/.folio/settings.json`).
pub fn settings_path() -> PathBuf {
    folio_core::constants::data_dir().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<FolioSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<FolioSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

/// Defaults with the user file merged on top (no env overrides).
fn load_file_layer(path: &Path) -> Result<FolioSettings> {
    let defaults = serde_json::to_value(FolioSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: FolioSettings = serde_json::from_value(merged)?;
    reset_out_of_range(&mut settings);
    Ok(settings)
}

/// Put numeric file values outside their accepted range back to the default.
fn reset_out_of_range(settings: &mut FolioSettings) {
    if !TIMEOUT_MS_RANGE.contains(&settings.api.timeout_ms) {
        let default = ApiSettings::default().timeout_ms;
        tracing::warn!(
            key = "api.timeoutMs",
            value = settings.api.timeout_ms,
            default,
            "out-of-range setting, using default"
        );
        settings.api.timeout_ms = default;
    }
    if !TTL_MS_RANGE.contains(&settings.notifications.ttl_ms) {
        let default = NotificationSettings::default().ttl_ms;
        tracing::warn!(
            key = "notifications.ttlMs",
            value = settings.notifications.ttl_ms,
            default,
            "out-of-range setting, using default"
        );
        settings.notifications.ttl_ms = default;
    }
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `FOLIO_*` overrides read through `lookup`.
///
/// Empty values are ignored. Numeric values outside their range are ignored
/// with a warning.
pub fn apply_env_overrides(settings: &mut FolioSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read_string = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = read_string("FOLIO_API_URL") {
        settings.api.base_url = v;
    }
    if let Some(v) = read_string("FOLIO_API_PREFIX") {
        settings.api.path_prefix = v;
    }
    if let Some(v) = read_string("FOLIO_API_TIMEOUT_MS") {
        if let Some(ms) = checked_u64("FOLIO_API_TIMEOUT_MS", &v, &TIMEOUT_MS_RANGE) {
            settings.api.timeout_ms = ms;
        }
    }
    if let Some(v) = read_string("FOLIO_TOKEN_FILE") {
        settings.session.token_file = PathBuf::from(v);
    }
    if let Some(v) = read_string("FOLIO_NOTIFY_TTL_MS") {
        if let Some(ms) = checked_u64("FOLIO_NOTIFY_TTL_MS", &v, &TTL_MS_RANGE) {
            settings.notifications.ttl_ms = ms;
        }
    }
    if let Some(v) = read_string("FOLIO_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

/// Parse a string as a `u64` within an inclusive range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (min..=max).contains(&n).then_some(n)
}

fn checked_u64(name: &str, val: &str, range: &RangeInclusive<u64>) -> Option<u64> {
    let result = parse_u64_range(val, *range.start(), *range.end());
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
