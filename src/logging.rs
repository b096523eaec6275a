use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: dependencies stay at `warn`, this
/// crate logs at `level`.
pub fn filter_directives(level: &str) -> String {
    match level.trim() {
        "" => "warn".to_owned(),
        level => format!("warn,phonetic_feedback={level}"),
    }
}

/// Installs the global stderr subscriber. `RUST_LOG` takes precedence over
/// `level`.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_subscriber(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init()
        .is_ok()
}
