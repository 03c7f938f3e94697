//! Package-level constants.

/// Current version of the Folio client (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "folio";

/// Path prefix prepended to every API resource path.
pub const API_PREFIX: &str = "/api/v1";

/// Name of the durable slot holding the bearer token.
pub const TOKEN_SLOT: &str = "token";

/// How long a notification stays visible before it expires.
pub const NOTIFICATION_TTL_MS: u64 = 3_000;

/// Name of the per-user data directory under `$HOME`.
pub const DATA_DIR_NAME: &str = ".folio";

/// Resolve the per-user data directory (`~/.folio`).
pub fn data_dir() -> std::path::PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    std::path::PathBuf::from(home).join(DATA_DIR_NAME)
}
