// Database access: connection pool, executor seam and partition maintenance

pub mod catalog;
pub mod config;
pub mod partition;
pub mod pool;
pub mod query;
pub mod sql;

#[cfg(test)]
pub(crate) mod testing;

pub use partition::PartitionManager;
pub use query::{BoxError, Executor, QueryExecutor};
