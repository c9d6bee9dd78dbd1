use chrono::NaiveDate;
use thiserror::Error;

use crate::db::query::BoxError;

/// Errors raised while planning or applying partition maintenance
#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("period must be 'month', 'week', or 'day' (got '{0}')")]
    InvalidPeriod(String),

    #[error("parent table must be written as <schema>.<table> (got '{0}')")]
    InvalidParentTable(String),

    #[error("date arithmetic from {0} leaves the supported calendar range")]
    DateOutOfRange(NaiveDate),

    #[error("cannot encode {0} as a sortable identifier bound")]
    BoundOutOfRange(NaiveDate),

    #[error("catalog row has {0} columns, expected schema and table name")]
    MalformedCatalogRow(usize),

    /// Whatever the executor returned, passed through untouched
    #[error(transparent)]
    Executor(#[from] BoxError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    CreatePool(#[from] deadpool_postgres::CreatePoolError),

    #[error(transparent)]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),
}

impl PartitionError {
    /// Configuration errors are fatal: the caller has to fix the input
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            PartitionError::InvalidPeriod(_)
                | PartitionError::InvalidParentTable(_)
                | PartitionError::Yaml(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PartitionError>;
