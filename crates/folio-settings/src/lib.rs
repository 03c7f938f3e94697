//! # folio-settings
//!
//! Configuration for the Folio client, loaded from three layers (in priority
//! order):
//! 1. **Compiled defaults** — [`FolioSettings::default()`]
//! 2. **User file** — `~/.folio/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `FOLIO_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use folio_settings::load_settings;
//!
//! let settings = load_settings().unwrap_or_default();
//! println!("API: {}{}", settings.api.base_url, settings.api.path_prefix);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = FolioSettings::default();
        assert_eq!(settings.api.base_url, "http://localhost:8000");
        assert_eq!(settings.api.path_prefix, "/api/v1");
        assert_eq!(settings.api.timeout_ms, 15_000);
        assert_eq!(settings.notifications.ttl_ms, 3_000);
        assert_eq!(settings.logging.level, "warn");
        assert!(settings.session.token_file.ends_with("token"));
    }
}
