use anyhow::Result;
use chrono::{DateTime, Utc};
use fleetmon_client::NodeDetail;
use std::path::{Path, PathBuf};

/// Dumps the raw detail records of one cycle to
/// `{dir}/servers_{epoch_secs}.json`. Pure side effect: the evaluation
/// outcome never depends on it, and a failed write only costs the archive.
pub fn archive_snapshots(dir: &Path, details: &[NodeDetail], now: DateTime<Utc>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("servers_{}.json", now.timestamp()));
    let json = serde_json::to_string_pretty(details)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
