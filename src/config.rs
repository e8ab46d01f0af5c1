use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const ENV_API_KEY: &str = "BOOKER25_API_KEY";
pub const ENV_ENVIRONMENT: &str = "BOOKER25_ENVIRONMENT";
pub const ENV_BASE_URL: &str = "BOOKER25_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "BOOKER25_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Backend deployment to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Develop,
    Acceptance,
    Staging,
    #[default]
    Production,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Develop => "https://api.develop.booker25.com/api/v3/proxy",
            Environment::Acceptance => "https://api.acceptance.booker25.com/api/v3/proxy",
            Environment::Staging => "https://api.staging.booker25.com/api/v3/proxy",
            Environment::Production => "https://api.booker25.com/api/v3/proxy",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "develop" | "dev" => Ok(Environment::Develop),
            "acceptance" | "acc" => Ok(Environment::Acceptance),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::Invalid {
                var: ENV_ENVIRONMENT,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Develop => "develop",
            Environment::Acceptance => "acceptance",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub environment: Environment,
    /// Overrides the environment's base URL (e.g. a local proxy).
    pub base_url: Option<String>,
    pub timeout: Duration,
}

// Keeps the key out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, environment: Environment) -> Self {
        Self {
            api_key: api_key.into(),
            environment,
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing(ENV_API_KEY))?;
        let environment = match lookup(ENV_ENVIRONMENT) {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };
        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(value) => value.parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: ENV_TIMEOUT_SECS,
                value,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            api_key,
            environment,
            base_url: lookup(ENV_BASE_URL).filter(|u| !u.is_empty()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
    }
}
