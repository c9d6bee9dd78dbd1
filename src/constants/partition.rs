// Partition maintenance SQL

/// Child tables of a parent that sort before the cutoff name.
///
/// `$1` schema, `$2` escaped `LIKE` pattern for `<table>_p%`,
/// `$3` `<table>_p<cutoff suffix>`.
pub const LIST_EXPIRED_CHILD_TABLES: &str = "select n.nspname, c.relname from pg_class c inner join pg_namespace n on n.oid = c.relnamespace where n.nspname = $1 and c.relname like $2 and c.relkind = 'r' and c.relname < $3 order by 1, 2";

/// Marker between the parent table name and the child's date suffix
pub const CHILD_TABLE_MARKER: &str = "_p";

/// `strftime` pattern of the child table suffix
pub const CHILD_SUFFIX_FORMAT: &str = "%Y_%m_%d";

/// Longest identifier PostgreSQL keeps (NAMEDATALEN - 1), in bytes
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Length of a `YYYY_MM_DD` child suffix
pub const CHILD_SUFFIX_LEN: usize = 10;

/// Future periods created when `premake` is not configured
pub const DEFAULT_PREMAKE: u32 = 4;
