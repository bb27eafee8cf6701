use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Installs the global fmt subscriber, honoring `RUST_LOG`.
/// Calling it twice is harmless, later calls are ignored.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = if cfg!(test) {
        builder.compact().with_test_writer().try_init()
    } else {
        builder.try_init()
    };
    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}
