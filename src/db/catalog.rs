use std::fmt;

use chrono::NaiveDate;

use super::query::TextRow;
use crate::constants::partition::{CHILD_SUFFIX_FORMAT, CHILD_TABLE_MARKER};
use crate::error::{PartitionError, Result};

/// `<table>_p<YYYY_MM_DD>` for the period starting at `start`
pub fn child_table_name(table: &str, start: NaiveDate) -> String {
    format!("{}{}{}", table, CHILD_TABLE_MARKER, start.format(CHILD_SUFFIX_FORMAT))
}

/// A child table as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildTableRef {
    pub schema: String,
    pub table_name: String,
}

impl ChildTableRef {
    pub fn from_row(row: TextRow) -> Result<Self> {
        let columns = row.len();
        let mut row = row.into_iter();
        match (row.next(), row.next()) {
            (Some(schema), Some(table_name)) => Ok(Self { schema, table_name }),
            _ => Err(PartitionError::MalformedCatalogRow(columns)),
        }
    }

    /// Start date encoded in the name, if it has the `<table>_p<date>` shape
    pub fn start_date(&self, table: &str) -> Option<NaiveDate> {
        let suffix = self
            .table_name
            .strip_prefix(table)?
            .strip_prefix(CHILD_TABLE_MARKER)?;
        // exact width keeps the name in step with lexicographic ordering
        if suffix.len() != 10 {
            return None;
        }
        NaiveDate::parse_from_str(suffix, CHILD_SUFFIX_FORMAT).ok()
    }
}

impl fmt::Display for ChildTableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table_name)
    }
}
