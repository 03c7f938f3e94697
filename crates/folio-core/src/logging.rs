//! Structured logging setup.
//!
//! All crates log through `tracing` macros. The binary installs a compact
//! stderr subscriber once at startup; `RUST_LOG` takes precedence over the
//! configured level.

/// Initialize the global tracing subscriber with stderr output.
///
/// Call once at application startup. Subsequent calls are no-ops.
///
/// # Arguments
///
/// * `level` - Minimum log level to display when `RUST_LOG` is unset.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init fails if a global subscriber is already installed
    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_subscriber_does_not_panic() {
        init_subscriber("warn");
        init_subscriber("debug");
    }
}
