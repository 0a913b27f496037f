use anyhow::Result;
use fleetmon_server::config::ServerConfig;
use fleetmon_server::scheduler::CheckScheduler;
use fleetmon_storage::sqlite::SqliteStateStore;
use fleetmon_storage::StateStore;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  fleetmon-server [config.toml]             Start the monitor daemon");
    eprintln!("  fleetmon-server check-once [config.toml]  Run a single check cycle and print the report");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fleetmon=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("check-once") => {
            let config_path = args
                .get(2)
                .map(|s| s.as_str())
                .unwrap_or("config/fleetmon.toml");
            run_check_once(config_path).await
        }
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        _ => {
            let config_path = args
                .get(1)
                .map(|s| s.as_str())
                .unwrap_or("config/fleetmon.toml");
            run_server(config_path).await
        }
    }
}

fn open_store(config: &ServerConfig) -> Result<Arc<SqliteStateStore>> {
    let state_path = Path::new(&config.check.state_path);
    if let Some(parent) = state_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Arc::new(SqliteStateStore::new(state_path)?))
}

async fn run_server(config_path: &str) -> Result<()> {
    let config = ServerConfig::load(config_path)?;

    tracing::info!(
        endpoint = %config.endpoint,
        interval_secs = config.check.interval_secs,
        state_path = %config.check.state_path,
        "fleetmon-server starting"
    );

    let store = open_store(&config)?;

    // Hourly purge keeps the state table from collecting rows for nodes
    // that stopped reporting.
    let purge_store = store.clone();
    let purge_handle = tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(3600));
        loop {
            tick.tick().await;
            match purge_store.purge_expired() {
                Ok(removed) if removed > 0 => {
                    tracing::info!(removed, "Purged expired state records")
                }
                Err(e) => tracing::error!(error = %e, "State purge failed"),
                _ => {}
            }
        }
    });

    let scheduler = CheckScheduler::new(config_path, store as Arc<dyn StateStore>);

    tokio::select! {
        result = scheduler.run(config.check.interval_secs) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Scheduler error");
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("Shutting down gracefully");
        }
    }

    purge_handle.abort();
    tracing::info!("Server stopped");
    Ok(())
}

#[allow(clippy::print_stdout)]
async fn run_check_once(config_path: &str) -> Result<()> {
    let config = ServerConfig::load(config_path)?;
    let store = open_store(&config)?;
    let scheduler = CheckScheduler::new(config_path, store as Arc<dyn StateStore>);

    match scheduler.run_cycle_once(&config).await? {
        Some(report) => println!("{report}"),
        None => println!("No alert state transitions this cycle."),
    }
    Ok(())
}
