//src/logging.rs
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Installs the global stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` forces debug output for this
/// crate and `default_level` (from the config file) applies.
pub fn init(default_level: &str, verbose: bool) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) => EnvFilter::try_new(directives)?,
        Err(_) if verbose => EnvFilter::try_new(format!(
            "{}=debug",
            env!("CARGO_PKG_NAME").replace('-', "_")
        ))?,
        Err(_) => EnvFilter::try_new(default_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}

/// Validates a level string before it is written to the config file.
#[must_use]
pub fn is_valid_level(level: &str) -> bool {
    matches!(
        level.to_ascii_lowercase().as_str(),
        "error" | "warn" | "info" | "debug" | "trace" | "off"
    )
}
