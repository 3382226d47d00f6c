use tracing_subscriber::{EnvFilter, fmt};

/// Initialize structured logging for the process.
///
/// Log level filtering comes from the environment (`RUST_LOG`), defaulting
/// to "info". Output is JSON with flattened event fields.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .init();
}
