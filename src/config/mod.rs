pub mod settings;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::batch::FailurePolicy;
use crate::constants::partition::{
    CHILD_SUFFIX_LEN, CHILD_TABLE_MARKER, DEFAULT_PREMAKE, MAX_IDENTIFIER_LEN,
};
use crate::db::config::ConnectionConfig;
use crate::error::{PartitionError, Result};
use crate::period::Period;

/// Maintenance policy for one partitioned parent table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartitionConfig {
    /// `<schema>.<table>`
    pub parent_table: String,
    pub period: Period,
    /// Future periods created beyond the current one
    #[serde(default = "default_premake")]
    pub premake: u32,
    /// Periods kept before the cutoff. Unset means the period's default.
    #[serde(default)]
    pub retain: Option<u32>,
    #[serde(default)]
    pub cascade: bool,
    /// Truncate before dropping. Only honoured together with `cascade`.
    #[serde(default)]
    pub truncate: bool,
    /// Partition key is a ULID column rather than a date
    #[serde(default)]
    pub ulid: bool,
}

fn default_premake() -> u32 {
    DEFAULT_PREMAKE
}

impl PartitionConfig {
    pub fn new<S: Into<String>>(parent_table: S, period: Period) -> Self {
        Self {
            parent_table: parent_table.into(),
            period,
            premake: DEFAULT_PREMAKE,
            retain: None,
            cascade: false,
            truncate: false,
            ulid: false,
        }
    }

    pub fn with_premake(mut self, premake: u32) -> Self {
        self.premake = premake;
        self
    }

    pub fn with_retain(mut self, retain: u32) -> Self {
        self.retain = Some(retain);
        self
    }

    pub fn with_cascade(mut self, cascade: bool) -> Self {
        self.cascade = cascade;
        self
    }

    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn with_ulid(mut self, ulid: bool) -> Self {
        self.ulid = ulid;
        self
    }

    pub fn effective_retain(&self) -> u32 {
        self.retain.unwrap_or_else(|| self.period.default_retain())
    }

    /// Splits `parent_table` into schema and table.
    ///
    /// The table part must leave room for the `_pYYYY_MM_DD` suffix within
    /// PostgreSQL's identifier limit, otherwise every child name would be
    /// truncated to the same identifier.
    pub fn schema_and_table(&self) -> Result<(&str, &str)> {
        let invalid = || PartitionError::InvalidParentTable(self.parent_table.clone());
        let (schema, table) = self.parent_table.split_once('.').ok_or_else(invalid)?;
        if schema.is_empty() || table.is_empty() || table.contains('.') {
            return Err(invalid());
        }
        if schema.len() > MAX_IDENTIFIER_LEN || table.len() > max_parent_table_len() {
            return Err(invalid());
        }
        Ok((schema, table))
    }
}

/// Longest parent table name, in bytes, whose child names stay intact
pub const fn max_parent_table_len() -> usize {
    MAX_IDENTIFIER_LEN - CHILD_TABLE_MARKER.len() - CHILD_SUFFIX_LEN
}

/// A configuration entry, optionally pointing at its own database
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "PartitionEntryFields", into = "PartitionEntryFields")]
pub struct PartitionEntry {
    pub partition: PartitionConfig,
    pub database_url: Option<String>,
}

/// On-disk shape of [`PartitionEntry`]. Unknown keys are rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartitionEntryFields {
    parent_table: String,
    period: Period,
    #[serde(default = "default_premake")]
    premake: u32,
    #[serde(default)]
    retain: Option<u32>,
    #[serde(default)]
    cascade: bool,
    #[serde(default)]
    truncate: bool,
    #[serde(default)]
    ulid: bool,
    #[serde(default)]
    database_url: Option<String>,
}

impl From<PartitionEntryFields> for PartitionEntry {
    fn from(fields: PartitionEntryFields) -> Self {
        Self {
            partition: PartitionConfig {
                parent_table: fields.parent_table,
                period: fields.period,
                premake: fields.premake,
                retain: fields.retain,
                cascade: fields.cascade,
                truncate: fields.truncate,
                ulid: fields.ulid,
            },
            database_url: fields.database_url,
        }
    }
}

impl From<PartitionEntry> for PartitionEntryFields {
    fn from(entry: PartitionEntry) -> Self {
        let p = entry.partition;
        Self {
            parent_table: p.parent_table,
            period: p.period,
            premake: p.premake,
            retain: p.retain,
            cascade: p.cascade,
            truncate: p.truncate,
            ulid: p.ulid,
            database_url: entry.database_url,
        }
    }
}

/// Contents of the configuration file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub database: ConnectionConfig,
    #[serde(default)]
    pub on_error: FailurePolicy,
    #[serde(default)]
    pub partitions: Vec<PartitionEntry>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("loading configuration: {}", path.display());

        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = Self::from_yaml(&contents)?;
        info!("{} partition configuration(s) loaded", config.partitions.len());
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        for entry in &config.partitions {
            entry.partition.schema_and_table()?;
        }
        Ok(config)
    }
}
