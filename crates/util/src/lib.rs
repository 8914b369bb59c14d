pub mod config;
pub mod telemetry;

use std::{env, path::Path};

pub use config::{AppConfig, ConfigError, Environment};
pub use telemetry::{init_metrics, init_tracing, render_metrics, TelemetryError};

pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Loads environment variables from the dotenv file at `path`.
pub fn load_env_file_from(path: &Path) -> Result<(), dotenvy::Error> {
    dotenvy::from_path(path)
}

/// Returns the IANA name of the clinic timezone.
///
/// The value is resolved from the `CLINIC_TIMEZONE` environment variable and
/// falls back to [`DEFAULT_TIMEZONE`] when the variable is not set.
pub fn clinic_timezone_name() -> String {
    env::var("CLINIC_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string())
}

#[cfg(test)]
pub(crate) static ENV_GUARD: std::sync::LazyLock<std::sync::Mutex<()>> =
    std::sync::LazyLock::new(|| std::sync::Mutex::new(()));
