use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

use super::catalog::{child_table_name, ChildTableRef};
use super::query::Executor;
use super::sql;
use crate::bounds::{self, BoundEncoder};
use crate::config::PartitionConfig;
use crate::constants::partition::{CHILD_SUFFIX_FORMAT, CHILD_TABLE_MARKER, LIST_EXPIRED_CHILD_TABLES};
use crate::error::{PartitionError, Result};
use crate::period::PeriodRange;

/// Creates and drops the child tables of one parent table.
///
/// Built per run. The anchor date is fixed at construction, so
/// `create_tables` and `drop_tables` agree on the current period even if
/// the run crosses midnight.
pub struct PartitionManager<'a> {
    config: &'a PartitionConfig,
    schema: &'a str,
    table: &'a str,
    start: NaiveDate,
    retain: u32,
    encoder: Box<dyn BoundEncoder>,
    db: &'a dyn Executor,
}

impl<'a> PartitionManager<'a> {
    /// Manager anchored on today's date
    pub fn new(config: &'a PartitionConfig, db: &'a dyn Executor) -> Result<Self> {
        Self::with_reference_date(config, db, Local::now().date_naive())
    }

    pub fn with_reference_date(
        config: &'a PartitionConfig,
        db: &'a dyn Executor,
        reference: NaiveDate,
    ) -> Result<Self> {
        let (schema, table) = config.schema_and_table()?;
        if config.truncate && !config.cascade {
            warn!(
                "{}: truncate only applies together with cascade, tables will be dropped without truncating",
                config.parent_table
            );
        }

        Ok(Self {
            config,
            schema,
            table,
            start: config.period.anchor(reference),
            retain: config.effective_retain(),
            encoder: bounds::for_config(config.ulid),
            db,
        })
    }

    /// Replaces the bound encoder picked from the `ulid` flag
    pub fn with_encoder(mut self, encoder: Box<dyn BoundEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// First day of the current period
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Oldest period start that is kept
    pub fn retention_cutoff(&self) -> Result<NaiveDate> {
        self.config
            .period
            .retention_cutoff(self.start, self.retain)
            .ok_or(PartitionError::DateOutOfRange(self.start))
    }

    /// The current period followed by `premake` future ones
    pub fn planned_periods(&self) -> Result<Vec<PeriodRange>> {
        let wanted = self.config.premake as usize + 1;
        let periods: Vec<PeriodRange> = self.config.period.periods(self.start).take(wanted).collect();
        if periods.len() < wanted {
            let last = periods.last().map_or(self.start, |p| p.start);
            return Err(PartitionError::DateOutOfRange(last));
        }
        Ok(periods)
    }

    /// Creates the child tables for the current and future periods.
    ///
    /// Existing tables are left alone. Returns `schema.child` for every
    /// period handled, oldest first. The first failure stops the loop and
    /// leaves already created tables in place.
    pub async fn create_tables(&self) -> Result<Vec<String>> {
        let periods = self.planned_periods()?;
        let mut created = Vec::with_capacity(periods.len());

        for range in &periods {
            let child = child_table_name(self.table, range.start);
            let lower = self.encoder.lower(range)?;
            let upper = self.encoder.upper(range)?;
            let ddl = sql::create_partition(self.schema, &child, self.table, &lower, &upper);

            debug!("{}", ddl);
            self.db.execute(&ddl).await?;

            let child = format!("{}.{}", self.schema, child);
            info!("partition ready: {} [{}, {})", child, range.start, range.end);
            created.push(child);
        }

        Ok(created)
    }

    /// Drops child tables whose period starts before the retention cutoff.
    ///
    /// Returns `schema.child` for every dropped table in catalog order.
    pub async fn drop_tables(&self) -> Result<Vec<String>> {
        let cutoff = self.retention_cutoff()?;
        let cutoff_name = child_table_name(self.table, cutoff);
        let pattern = format!("{}%", sql::escape_like(&format!("{}{}", self.table, CHILD_TABLE_MARKER)));

        debug!(
            "{}: dropping children older than {} ({})",
            self.config.parent_table,
            cutoff.format(CHILD_SUFFIX_FORMAT),
            cutoff
        );
        let rows = self
            .db
            .query(
                LIST_EXPIRED_CHILD_TABLES,
                &[self.schema, pattern.as_str(), cutoff_name.as_str()],
            )
            .await?;

        let mut dropped = Vec::with_capacity(rows.len());
        for row in rows {
            let child = ChildTableRef::from_row(row)?;
            match child.start_date(self.table) {
                Some(start) if start < cutoff => {}
                _ => {
                    warn!("{}: not a dated child before {}, keeping it", child, cutoff);
                    continue;
                }
            }

            self.drop_child(&child).await?;
            info!("dropped expired partition: {}", child);
            dropped.push(child.to_string());
        }

        Ok(dropped)
    }

    async fn drop_child(&self, child: &ChildTableRef) -> Result<()> {
        if self.config.cascade && self.config.truncate {
            let truncate = sql::truncate_table(&child.schema, &child.table_name);
            debug!("{}", truncate);
            self.db.execute(&truncate).await?;
        }

        let drop = sql::drop_table(&child.schema, &child.table_name, self.config.cascade);
        debug!("{}", drop);
        self.db.execute(&drop).await?;
        Ok(())
    }
}
