use std::env;

use addons_core::{parse_timezone, ClinicCalendar};
use chrono_tz::Tz;
use thiserror::Error;

use super::clinic_timezone_name;

/// Application runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }

    /// Returns the canonical name used for logging/metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

/// Runtime configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub timezone: Tz,
}

impl AppConfig {
    /// Constructs the configuration by reading and validating environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_value = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let environment = Environment::from_str(&env_value)?;
        let timezone_name = clinic_timezone_name();
        let timezone = parse_timezone(&timezone_name)
            .map_err(|_| ConfigError::InvalidTimezone(timezone_name))?;

        Ok(Self {
            environment,
            timezone,
        })
    }

    /// Calendar reading the system clock in the clinic timezone.
    pub fn calendar(&self) -> ClinicCalendar {
        ClinicCalendar::system(self.timezone)
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("APP_ENV must be one of 'development', 'production', or 'test' (got {0})")]
    InvalidEnvironment(String),
    #[error("CLINIC_TIMEZONE must be an IANA timezone name (got {0})")]
    InvalidTimezone(String),
}
