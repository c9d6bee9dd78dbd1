use std::error::Error;

use async_trait::async_trait;
use log::trace;
use tokio_postgres::types::ToSql;

use super::pool::DatabasePool;

/// Error type executors hand back. Partition code passes it through as is.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// One result row with every column read as text
pub type TextRow = Vec<String>;

/// The only thing partition maintenance needs from a database
#[async_trait]
pub trait Executor: Send + Sync {
    /// Runs a statement that returns no rows, yielding the affected row count
    async fn execute(&self, sql: &str) -> Result<u64, BoxError>;

    /// Runs a parameterised query. `$1..$n` bind to `params` as text.
    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<TextRow>, BoxError>;
}

/// Executor backed by a connection pool
pub struct QueryExecutor {
    pool: DatabasePool,
}

impl QueryExecutor {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Executor for QueryExecutor {
    async fn execute(&self, sql: &str) -> Result<u64, BoxError> {
        let client = self.pool.get_client().await?;

        trace!("executing: {}", sql);
        let affected = client.execute(sql, &[]).await?;

        Ok(affected)
    }

    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<TextRow>, BoxError> {
        let client = self.pool.get_client().await?;

        trace!("querying: {} {:?}", sql, params);
        let binds: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect();
        let rows = client.query(sql, &binds).await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let mut columns = Vec::with_capacity(row.len());
            for idx in 0..row.len() {
                columns.push(row.try_get::<_, String>(idx)?);
            }
            results.push(columns);
        }

        Ok(results)
    }
}
