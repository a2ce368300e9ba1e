use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

/// Environment variable holding the log filter, e.g. `COURIER_LOG_LEVEL=debug`
pub const LOG_LEVEL_ENV: &str = "COURIER_LOG_LEVEL";

const DEFAULT_FILTER: &str = "warn,hyper=warn,tokio=warn";

/// Installs the stderr tracing subscriber
pub fn init_tracing_subscriber() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_valid() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
