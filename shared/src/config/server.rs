//! Server configuration module

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{env_parse, ConfigError};

/// Where issued tokens and user accounts are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// MySQL through the infra crate
    Mysql,
    /// Process-local maps, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::Mysql),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Mysql => write!(f, "mysql"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Storage backend for tokens and users
    #[serde(default = "default_storage")]
    pub storage: StorageBackend,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            workers: 0,
            storage: default_storage(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub(crate) fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = env_parse("SERVER_PORT")? {
            self.port = port;
        }
        if let Some(workers) = env_parse("SERVER_WORKERS")? {
            self.workers = workers;
        }
        if let Some(storage) = env_parse("STORAGE_BACKEND")? {
            self.storage = storage;
        }
        Ok(())
    }
}

fn default_storage() -> StorageBackend {
    StorageBackend::Mysql
}
