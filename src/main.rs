use std::collections::HashMap;
use std::error::Error;
#[cfg(debug_assertions)]
use std::io::Write;

#[cfg(debug_assertions)]
use chrono::Local;
use env_logger::Builder;
use log::{error, info, warn, LevelFilter};

use partition_keeper::batch::{self, PartitionJob};
use partition_keeper::config::settings::Settings;
use partition_keeper::db::pool::DatabasePool;
use partition_keeper::db::QueryExecutor;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logger();

    let arg_path = std::env::args().nth(1);
    let settings = Settings::load(arg_path.as_deref())?;
    settings.log_settings();

    let config = &settings.config;
    if config.partitions.is_empty() {
        warn!("no partitions configured, nothing to do");
        return Ok(());
    }

    let default_executor = QueryExecutor::new(DatabasePool::connect(&config.database).await?);

    // one pool per distinct override URL
    let mut overrides: HashMap<&str, QueryExecutor> = HashMap::new();
    for url in config.partitions.iter().filter_map(|e| e.database_url.as_deref()) {
        if !overrides.contains_key(url) {
            let pool = DatabasePool::connect(&config.database.with_url(url)).await?;
            overrides.insert(url, QueryExecutor::new(pool));
        }
    }

    let jobs: Vec<PartitionJob<'_>> = config
        .partitions
        .iter()
        .map(|entry| match entry.database_url.as_deref().and_then(|url| overrides.get(url)) {
            Some(executor) => PartitionJob::on(&entry.partition, executor),
            None => PartitionJob::new(&entry.partition),
        })
        .collect();

    let summary = batch::process(&jobs, &default_executor, config.on_error).await?;
    for report in &summary.reports {
        for table in &report.dropped {
            info!("dropped {}", table);
        }
        for table in &report.created {
            info!("ensured {}", table);
        }
    }

    if !summary.is_success() {
        for failure in &summary.failures {
            error!("{}: {}", failure.parent_table, failure.error);
        }
        return Err(format!("{} partition configuration(s) failed", summary.failures.len()).into());
    }

    Ok(())
}

/// Logger setup. `RUST_LOG` overrides the build default.
fn setup_logger() {
    #[cfg(debug_assertions)]
    {
        Builder::new()
            .filter(None, LevelFilter::Debug)
            .parse_default_env()
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{} {} {}:{}] {}",
                    Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                    record.level(),
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0),
                    record.args()
                )
            })
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        Builder::new()
            .filter(None, LevelFilter::Info)
            .parse_default_env()
            .init();
    }
}
