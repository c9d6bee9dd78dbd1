//! Time-range partition maintenance for PostgreSQL.
//!
//! For each configured parent table the current and upcoming periods get a
//! child table, and children older than the retention window are dropped.

pub mod batch;
pub mod bounds;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod period;

pub use batch::{process, FailurePolicy, PartitionJob, RunReport};
pub use config::PartitionConfig;
pub use db::{Executor, PartitionManager};
pub use error::{PartitionError, Result};
pub use period::Period;
