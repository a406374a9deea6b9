use tracing::dispatcher::DefaultGuard;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter(default_level: LevelFilter) -> EnvFilter {
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    EnvFilter::try_new(rust_log).unwrap_or_else(|err| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            err,
        );
        EnvFilter::new(default_level.to_string())
    })
}

/// Install the process-wide subscriber. Filter comes from `RUST_LOG`, INFO otherwise.
pub fn init_logger() {
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter(LevelFilter::INFO));
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global tracing subscriber: {}", err);
    }
}

/// Thread-local DEBUG subscriber writing through the test harness.
#[must_use]
pub fn init_test_logger() -> DefaultGuard {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .with(env_filter(LevelFilter::DEBUG))
        .set_default()
}
