use std::env;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::Config;
use crate::constants::{CONFIG_FILE_ENV, DEFAULT_CONFIG_FILE};
use crate::error::Result;

/// Where the configuration came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// File named by the environment
    Environment(PathBuf),
    /// File named on the command line
    Argument(PathBuf),
    /// `partitions.yml` in the working directory
    File(PathBuf),
    /// Nothing found
    Default,
}

/// Configuration resolved at process start
#[derive(Clone, Debug)]
pub struct Settings {
    pub config: Config,
    pub source: ConfigSource,
}

impl Settings {
    /// Loads the configuration file and applies environment overrides
    pub fn load(arg_path: Option<&str>) -> Result<Self> {
        let (config, source) = Self::load_config(env::var(CONFIG_FILE_ENV).ok(), arg_path)?;
        let mut settings = Self { config, source };
        settings.override_from_env(|key| env::var(key).ok());
        Ok(settings)
    }

    fn load_config(env_path: Option<String>, arg_path: Option<&str>) -> Result<(Config, ConfigSource)> {
        // 1. file named by the environment
        if let Some(path) = env_path {
            info!("configuration file from {}: {}", CONFIG_FILE_ENV, path);
            let path = PathBuf::from(path);
            return Ok((Config::from_file(&path)?, ConfigSource::Environment(path)));
        }

        // 2. file named on the command line
        if let Some(path) = arg_path {
            let path = PathBuf::from(path);
            return Ok((Config::from_file(&path)?, ConfigSource::Argument(path)));
        }

        // 3. partitions.yml in the working directory
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            return Ok((Config::from_file(&path)?, ConfigSource::File(path)));
        }

        // 4. defaults
        warn!("no configuration file found, using defaults");
        Ok((Config::default(), ConfigSource::Default))
    }

    /// Applies `DATABASE_URL` and `DB_*` overrides to the connection settings
    pub fn override_from_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let connection = &mut self.config.database;

        if let Some(url) = lookup("DATABASE_URL") {
            info!("database URL taken from DATABASE_URL");
            connection.url = Some(url);
        }

        if let Some(host) = lookup("DB_HOST") {
            info!("database host from environment: {}", host);
            connection.host = host;
        }

        if let Some(port) = lookup("DB_PORT") {
            match port.parse::<u16>() {
                Ok(port) => connection.port = port,
                Err(_) => warn!("DB_PORT is not a valid port number: {}", port),
            }
        }

        if let Some(name) = lookup("DB_NAME") {
            connection.database = name;
        }

        if let Some(user) = lookup("DB_USER") {
            connection.user = user;
        }

        if let Some(password) = lookup("DB_PASSWORD") {
            info!("database password taken from environment");
            connection.password = Some(password);
        }

        if let Some(max_conn) = lookup("DB_MAX_CONNECTIONS") {
            match max_conn.parse::<usize>() {
                Ok(max) if max > 0 => connection.max_connections = max,
                _ => warn!("DB_MAX_CONNECTIONS is not a positive integer: {}", max_conn),
            }
        }
    }

    pub fn log_settings(&self) {
        match &self.source {
            ConfigSource::Environment(path) | ConfigSource::Argument(path) | ConfigSource::File(path) => {
                info!("configuration source: {}", path.display())
            }
            ConfigSource::Default => info!("configuration source: defaults"),
        }
        info!("database: {}", self.config.database.target());
        info!("on error: {:?}", self.config.on_error);
        for entry in &self.config.partitions {
            let p = &entry.partition;
            info!(
                "partition {}: period={} premake={} retain={} cascade={} truncate={} ulid={}",
                p.parent_table,
                p.period,
                p.premake,
                p.effective_retain(),
                p.cascade,
                p.truncate,
                p.ulid
            );
        }
    }
}
