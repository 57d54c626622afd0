use crate::error::OpenError;
use crate::util::logging::{self, parse_level, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";

/// What an [`OpenStub`](crate::OpenStub) does for a path nobody registered
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Fallback {
    /// Fail with a not-found error naming the path
    #[default]
    Raise,
    /// Hand the call to the genuine open primitive
    Delegate,
    /// Register a fresh [`StubFile`](crate::StubFile) under the path and return it
    Placeholder,
    /// Assigned from text that names no policy; rejected at invocation
    Unrecognized(UnknownPolicy),
}

/// Text that named no policy. Only [`Fallback::parse`] builds one, so it
/// never holds a valid policy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicy(String);

impl UnknownPolicy {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Fallback {
    /// Parses leniently: unknown text becomes [`Fallback::Unrecognized`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "raise" => Fallback::Raise,
            "delegate" => Fallback::Delegate,
            "placeholder" => Fallback::Placeholder,
            _ => Fallback::Unrecognized(UnknownPolicy(value.to_string())),
        }
    }

    pub fn from_env() -> Self {
        env::var("OPENSTUB_FALLBACK")
            .ok()
            .map(|v| Fallback::parse(&v))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Fallback::Raise => "raise",
            Fallback::Delegate => "delegate",
            Fallback::Placeholder => "placeholder",
            Fallback::Unrecognized(value) => value.as_str(),
        }
    }

    pub fn validate(&self) -> Result<(), OpenError> {
        match self {
            Fallback::Unrecognized(value) => Err(OpenError::InvalidFallback(value.0.clone())),
            _ => Ok(()),
        }
    }
}

impl FromStr for Fallback {
    type Err = OpenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fallback = Fallback::parse(s);
        fallback.validate()?;
        Ok(fallback)
    }
}

impl From<&str> for Fallback {
    fn from(value: &str) -> Self {
        Fallback::parse(value)
    }
}

impl From<String> for Fallback {
    fn from(value: String) -> Self {
        Fallback::parse(&value)
    }
}

impl From<Fallback> for String {
    fn from(value: Fallback) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid fallback policy: {0}. Valid options: raise, delegate, placeholder")]
    InvalidFallback(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct StubConfig {
    pub fallback: Fallback,
    pub log_level: String,
}

impl Default for StubConfig {
    fn default() -> Self {
        let log_level = env::var("OPENSTUB_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            fallback: Fallback::from_env(),
            log_level,
        }
    }
}

impl StubConfig {
    /// Strict check. Invocation validates the fallback lazily either way.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Fallback::Unrecognized(value) = &self.fallback {
            return Err(ConfigError::InvalidFallback(value.0.clone()));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                other
            ))),
        }
    }
}

impl StubConfig {
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::with_level(parse_level(&self.log_level))
    }

    /// Installs the subscriber at this config's level.
    pub fn init_logging(&self) {
        logging::init_logging(self.logging_config());
    }
}

impl fmt::Display for StubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Open Stub Configuration:")?;
        writeln!(f, "  Fallback: {}", self.fallback)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
