//! Deployment environment and the log output it implies

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where the gateway is deployed. Production refuses the built-in
/// signing secret and logs less.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let env = match s.to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Environment::Development,
            "staging" | "stage" | "test" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            other => return Err(format!("unknown environment `{}`", other)),
        };
        Ok(env)
    }
}

/// Output shape of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event, for log shippers
    Json,
    /// Multi-line, human oriented
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format `{}`", other)),
        }
    }
}

/// Tracing setup handed to the binary's subscriber
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Verbose pretty logs while developing, JSON once deployed
    pub fn for_environment(env: Environment) -> Self {
        let (level, format) = match env {
            Environment::Development => ("debug", LogFormat::Pretty),
            Environment::Staging => ("info", LogFormat::Json),
            Environment::Production => ("warn", LogFormat::Json),
        };
        Self {
            level: level.to_string(),
            format,
        }
    }
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_aliases() {
        assert_eq!("local".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!("TEST".parse::<Environment>(), Ok(Environment::Staging));
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert!("qa".parse::<Environment>().is_err());
        assert!(Environment::Production.is_production());
        assert!(!Environment::default().is_production());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_deployed_environments_log_json() {
        let dev = LoggingConfig::for_environment(Environment::Development);
        assert_eq!((dev.level.as_str(), dev.format), ("debug", LogFormat::Pretty));

        let prod = LoggingConfig::for_environment(Environment::Production);
        assert_eq!((prod.level.as_str(), prod.format), ("warn", LogFormat::Json));

        assert_eq!(LoggingConfig::default().format, LogFormat::Pretty);
    }
}
