use deadpool_postgres::{Client, Config, Pool, PoolConfig, PoolError, Runtime};
use log::{debug, info};
use tokio_postgres::NoTls;

use super::config::ConnectionConfig;
use crate::error::Result;

/// Connection pool for one database
pub struct DatabasePool {
    pool: Pool,
}

impl DatabasePool {
    /// Builds the pool and checks that a connection can be made
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let mut cfg = Config::new();
        match &config.url {
            Some(url) => cfg.url = Some(url.clone()),
            None => {
                cfg.host = Some(config.host.clone());
                cfg.port = Some(config.port);
                cfg.user = Some(config.user.clone());
                cfg.password = config.password.clone();
                cfg.dbname = Some(config.database.clone());
            }
        }
        cfg.pool = Some(PoolConfig::new(config.max_connections));
        cfg.connect_timeout = Some(config.connection_timeout());

        debug!(
            "creating connection pool for {} (max connections: {})",
            config.target(),
            config.max_connections
        );
        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;

        let client = pool.get().await?;
        client.execute("SELECT 1", &[]).await?;
        info!("connected to {}", config.target());

        Ok(Self { pool })
    }

    pub async fn get_client(&self) -> std::result::Result<Client, PoolError> {
        self.pool.get().await
    }
}
