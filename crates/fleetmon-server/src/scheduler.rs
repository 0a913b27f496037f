use crate::archive;
use crate::config::ServerConfig;
use anyhow::Result;
use chrono::Utc;
use fleetmon_alert::cycle::{run_cycle, CycleOptions};
use fleetmon_alert::resolver::effective_rules;
use fleetmon_client::DashboardClient;
use fleetmon_common::types::{NodeSnapshot, RuleOverride};
use fleetmon_notify::channels::onebot::OneBotChannel;
use fleetmon_notify::report::build_report;
use fleetmon_notify::routing::{Dispatcher, SendRoute};
use fleetmon_storage::StateStore;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Drives the fixed-cadence evaluation loop.
///
/// Each tick is awaited to completion before the next one runs, so cycles
/// never overlap; a cycle that overruns the interval defers the next tick.
/// The configuration file is re-read at the start of every cycle and passed
/// down; nothing below this layer caches it.
pub struct CheckScheduler {
    config_path: String,
    store: Arc<dyn StateStore>,
}

impl CheckScheduler {
    pub fn new(config_path: &str, store: Arc<dyn StateStore>) -> Self {
        Self {
            config_path: config_path.to_string(),
            store,
        }
    }

    pub async fn run(&self, interval_secs: u64) -> Result<()> {
        tracing::info!(interval_secs, "Check scheduler started");

        let mut tick = interval(Duration::from_secs(interval_secs.max(1)));
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            let config = match ServerConfig::load(&self.config_path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(path = %self.config_path, error = %e, "Config reload failed, skipping cycle");
                    continue;
                }
            };
            match self.run_cycle_once(&config).await {
                Ok(Some(_)) => {}
                Ok(None) => tracing::debug!("Cycle finished with no events"),
                Err(e) => tracing::error!(error = %e, "Check cycle failed"),
            }
        }
    }

    /// Runs one full poll-evaluate-notify cycle. Returns the report text
    /// when the cycle produced events.
    ///
    /// A dashboard fetch failure aborts the cycle before any state is
    /// touched; the next tick is the retry.
    pub async fn run_cycle_once(&self, config: &ServerConfig) -> Result<Option<String>> {
        let client = DashboardClient::new(&config.endpoint, &config.token)?;

        let nodes = client.list_nodes(config.check.tag.as_deref()).await?;
        if nodes.is_empty() {
            tracing::info!("No nodes registered on the dashboard");
            return Ok(None);
        }
        let ids: Vec<i64> = nodes.iter().map(|n| n.id).collect();
        let details = client.node_details(&ids).await?;

        let now = Utc::now();
        match archive::archive_snapshots(Path::new(&config.check.archive_dir), &details, now) {
            Ok(path) => tracing::debug!(path = %path.display(), "Archived raw snapshots"),
            Err(e) => tracing::warn!(error = %e, "Snapshot archive write failed"),
        }

        let snapshots: Vec<NodeSnapshot> = details.iter().map(|d| d.to_snapshot()).collect();
        let exceptions = parse_exceptions(&config.check.rules.exception);
        let rules_per_node = effective_rules(
            &config.check.rules.items,
            &exceptions,
            snapshots.iter().map(|s| s.id),
        );

        let options = CycleOptions {
            state_ttl_secs: config.check.state_ttl_secs,
        };
        let outcome = run_cycle(
            self.store.as_ref(),
            &snapshots,
            &rules_per_node,
            now.timestamp(),
            &options,
        )
        .await;

        for failure in &outcome.failures {
            tracing::warn!(node_id = failure.node_id, reason = %failure.reason, "Node diagnostic");
        }
        tracing::info!(
            nodes = snapshots.len(),
            events = outcome.events.len(),
            failures = outcome.failures.len(),
            "Check cycle finished"
        );

        let Some(text) = build_report(&outcome.events, &config.check.locale) else {
            return Ok(None);
        };

        let (dispatcher, routes) = build_dispatcher(config);
        if routes.is_empty() {
            tracing::warn!("Events fired but no send targets are configured");
        } else {
            let delivered = dispatcher.dispatch(&routes, &text).await;
            tracing::info!(delivered, "Report dispatched");
        }
        Ok(Some(text))
    }
}

/// Exception keys arrive as strings from the config file; non-numeric ids
/// are configuration garbage and only cost a warning.
fn parse_exceptions(
    raw: &HashMap<String, Vec<RuleOverride>>,
) -> HashMap<i64, Vec<RuleOverride>> {
    let mut exceptions = HashMap::new();
    for (key, overrides) in raw {
        match key.parse::<i64>() {
            Ok(node_id) => {
                exceptions.insert(node_id, overrides.clone());
            }
            Err(_) => {
                tracing::warn!(key = %key, "Ignoring rule exception with non-numeric node id");
            }
        }
    }
    exceptions
}

fn build_dispatcher(config: &ServerConfig) -> (Dispatcher, Vec<SendRoute>) {
    let mut dispatcher = Dispatcher::new();
    for (bot_id, bot) in &config.bots {
        dispatcher.register(
            bot_id.clone(),
            Box::new(OneBotChannel::new(&bot.endpoint, bot.access_token.as_deref())),
        );
    }

    let routes = config
        .send
        .iter()
        .map(|(bot_id, target)| SendRoute {
            bot_id: bot_id.clone(),
            private: target.private.clone(),
            group: target.group.clone(),
        })
        .collect();
    (dispatcher, routes)
}
