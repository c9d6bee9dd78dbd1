// Shared constants
pub mod partition;

// Configuration file lookup
pub const CONFIG_FILE_ENV: &str = "PARTITION_KEEPER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "partitions.yml";

// Connection defaults
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_MAX_CONNECTIONS: usize = 4;
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
