use std::{env, path::PathBuf};

use tracing_subscriber::EnvFilter;

const HISTORY_PATH_VAR: &str = "BILLSPLIT_HISTORY_PATH";
const DEFAULT_HISTORY_PATH: &str = "billsplit-history.json";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub history_path: PathBuf,
}

impl AppConfig {
    /// Reads the process environment after loading a `.env` file, if any.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let history_path = lookup(HISTORY_PATH_VAR)
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH), PathBuf::from);
        Self { history_path }
    }
}

/// Initialize logging and tracing
///
/// Logs go to stderr so command output on stdout stays clean. `RUST_LOG` overrides the
/// default `warn` level.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
