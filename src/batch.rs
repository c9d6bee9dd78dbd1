//! Maintenance over a list of partition configurations.

use std::time::Instant;

use chrono::{Local, NaiveDate};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::config::PartitionConfig;
use crate::db::{Executor, PartitionManager};
use crate::error::{PartitionError, Result};

/// What to do with the remaining configurations after one fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Return the first error, skipping everything after it
    #[default]
    Stop,
    /// Record the error and carry on with the next configuration
    Continue,
}

/// One configuration to process, optionally on its own database
pub struct PartitionJob<'a> {
    pub config: &'a PartitionConfig,
    pub executor: Option<&'a dyn Executor>,
}

impl<'a> PartitionJob<'a> {
    pub fn new(config: &'a PartitionConfig) -> Self {
        Self { config, executor: None }
    }

    pub fn on(config: &'a PartitionConfig, executor: &'a dyn Executor) -> Self {
        Self {
            config,
            executor: Some(executor),
        }
    }
}

/// Tables touched for one parent table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub parent_table: String,
    pub dropped: Vec<String>,
    pub created: Vec<String>,
}

#[derive(Debug)]
pub struct BatchFailure {
    pub parent_table: String,
    pub error: PartitionError,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<RunReport>,
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drops expired then creates future partitions for one configuration
pub async fn process_one(
    config: &PartitionConfig,
    db: &dyn Executor,
    reference: NaiveDate,
) -> Result<RunReport> {
    let manager = PartitionManager::with_reference_date(config, db, reference)?;
    let dropped = manager.drop_tables().await?;
    let created = manager.create_tables().await?;

    Ok(RunReport {
        parent_table: config.parent_table.clone(),
        dropped,
        created,
    })
}

/// Runs [`process_one`] for every job in order, anchored on today
pub async fn process(
    jobs: &[PartitionJob<'_>],
    default_executor: &dyn Executor,
    policy: FailurePolicy,
) -> Result<BatchSummary> {
    process_on(jobs, default_executor, policy, Local::now().date_naive()).await
}

/// [`process`] with an explicit reference date
pub async fn process_on(
    jobs: &[PartitionJob<'_>],
    default_executor: &dyn Executor,
    policy: FailurePolicy,
    reference: NaiveDate,
) -> Result<BatchSummary> {
    let started = Instant::now();
    let mut summary = BatchSummary::default();

    for job in jobs {
        let db = job.executor.unwrap_or(default_executor);
        let parent_table = job.config.parent_table.clone();

        match process_one(job.config, db, reference).await {
            Ok(report) => {
                info!(
                    "{}: {} dropped, {} ensured",
                    report.parent_table,
                    report.dropped.len(),
                    report.created.len()
                );
                summary.reports.push(report);
            }
            Err(e) => {
                error!("{}: partition maintenance failed: {}", parent_table, e);
                match policy {
                    FailurePolicy::Stop => return Err(e),
                    FailurePolicy::Continue => summary.failures.push(BatchFailure {
                        parent_table,
                        error: e,
                    }),
                }
            }
        }
    }

    info!(
        "processed {} configuration(s) in {} ({} failed)",
        jobs.len(),
        humantime::format_duration(started.elapsed()),
        summary.failures.len()
    );
    Ok(summary)
}
