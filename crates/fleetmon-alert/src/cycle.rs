use crate::evaluator::evaluate;
use fleetmon_common::types::{AlertEvent, AlertState, MetricKind, NodeSnapshot, Rule};
use fleetmon_storage::StateStore;
use std::collections::HashMap;

/// Persisted records outlive the poll cadence by a wide margin; a monitor
/// that stops polling self-heals within the hour.
pub const DEFAULT_STATE_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct CycleOptions {
    pub state_ttl_secs: u64,
}

impl Default for CycleOptions {
    fn default() -> Self {
        Self {
            state_ttl_secs: DEFAULT_STATE_TTL_SECS,
        }
    }
}

/// A per-node problem that did not abort the batch.
#[derive(Debug, Clone)]
pub struct NodeFailure {
    pub node_id: i64,
    pub reason: String,
}

/// Everything one evaluation cycle produced.
#[derive(Debug, Default)]
pub struct CycleOutcome {
    /// Fired events, in snapshot order and metric evaluation order.
    pub events: Vec<AlertEvent>,
    /// Per-node diagnostics (store failures, missing rule sets).
    pub failures: Vec<NodeFailure>,
}

/// Evaluates one batch of node snapshots against per-node effective rules.
///
/// For each snapshot: load prior state (an unreadable record counts as
/// absent), run the evaluator once per enabled metric kind, then persist the
/// new entry set, or delete the record entirely when no metric is tracked,
/// so the store never accumulates empty records. Per-node failures are
/// collected as diagnostics; they never drop the node's already-computed
/// events and never abort the rest of the batch.
pub async fn run_cycle(
    store: &dyn StateStore,
    snapshots: &[NodeSnapshot],
    rules_per_node: &HashMap<i64, Vec<Rule>>,
    now_secs: i64,
    options: &CycleOptions,
) -> CycleOutcome {
    let mut outcome = CycleOutcome::default();

    for snapshot in snapshots {
        let Some(rules) = rules_per_node.get(&snapshot.id) else {
            tracing::warn!(node_id = snapshot.id, "No effective rule set for node, skipping");
            outcome.failures.push(NodeFailure {
                node_id: snapshot.id,
                reason: "no effective rule set".to_string(),
            });
            continue;
        };

        let prior = match store.get(snapshot.id).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(node_id = snapshot.id, error = %e, "State read failed, starting clear");
                outcome.failures.push(NodeFailure {
                    node_id: snapshot.id,
                    reason: format!("state read failed: {e}"),
                });
                None
            }
        };

        let mut next = AlertState::new(snapshot.id);
        for kind in MetricKind::ALL {
            // A missing or disabled rule means the metric is not monitored:
            // no tracking, no events.
            let Some(rule) = rules.iter().find(|r| r.metric == kind) else {
                continue;
            };
            if !rule.enabled {
                continue;
            }

            let prior_entry = prior.as_ref().and_then(|s| s.entry(kind));
            let evaluation = evaluate(snapshot.metric(kind), rule, prior_entry, now_secs);

            if let Some(entry) = evaluation.entry {
                next.entries.push(entry);
            }
            if let Some(event) = evaluation.event {
                tracing::info!(
                    node_id = snapshot.id,
                    node = %snapshot.name,
                    metric = %event.metric,
                    kind = %event.kind,
                    value = event.current_value,
                    "Alert state transition"
                );
                outcome.events.push(AlertEvent {
                    node_id: snapshot.id,
                    node_name: snapshot.name.clone(),
                    metric: event.metric,
                    kind: event.kind,
                    current_value: event.current_value,
                    breach_duration_secs: event.breach_duration_secs,
                });
            }
        }

        let write_result = if next.entries.is_empty() {
            store.delete(snapshot.id).await
        } else {
            store.put(&next, options.state_ttl_secs).await
        };
        if let Err(e) = write_result {
            // Keep the node's events: a storage hiccup must not swallow a
            // real alert. Worst case the next cycle re-measures the breach.
            tracing::warn!(node_id = snapshot.id, error = %e, "State write failed");
            outcome.failures.push(NodeFailure {
                node_id: snapshot.id,
                reason: format!("state write failed: {e}"),
            });
        }
    }

    outcome
}
