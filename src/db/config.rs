use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_DB_PORT, DEFAULT_MAX_CONNECTIONS};

/// Database connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Full connection URL. Takes precedence over the discrete fields.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_connection_pool_size")]
    pub max_connections: usize,
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_seconds: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    DEFAULT_DB_PORT
}

fn default_database() -> String {
    "postgres".to_string()
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_connection_pool_size() -> usize {
    DEFAULT_MAX_CONNECTIONS
}

fn default_connection_timeout() -> u64 {
    DEFAULT_CONNECTION_TIMEOUT_SECS
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_host(),
            port: default_port(),
            database: default_database(),
            user: default_user(),
            password: None,
            max_connections: default_connection_pool_size(),
            connection_timeout_seconds: default_connection_timeout(),
        }
    }
}

impl ConnectionConfig {
    /// Same pool settings, different database
    pub fn with_url(&self, url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..self.clone()
        }
    }

    /// Where this config points, without credentials
    pub fn target(&self) -> String {
        match &self.url {
            Some(url) => redact_url(url),
            None => format!("{}:{}/{}", self.host, self.port, self.database),
        }
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_seconds)
    }
}

/// Drops the `user:password@` part of a connection URL
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}{}", &url[..scheme_end + 3], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}
