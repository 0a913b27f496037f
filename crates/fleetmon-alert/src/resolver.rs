use fleetmon_common::types::{MetricKind, Rule, RuleOverride};
use std::collections::HashMap;

/// Merges a default rule set with per-node overrides into an effective rule
/// set: exactly one rule per metric kind present in either input.
///
/// Overrides merge field-by-field: a present field wins, an absent field
/// keeps the default's value. An override for a kind with no default
/// materializes with zeroed thresholds and `enabled = false`, so a metric
/// that was never fully configured can never alert.
pub fn resolve_rules(defaults: &[Rule], overrides: &[RuleOverride]) -> Vec<Rule> {
    let mut by_kind: HashMap<MetricKind, Rule> = defaults
        .iter()
        .map(|rule| (rule.metric, rule.clone()))
        .collect();

    for over in overrides {
        match by_kind.get_mut(&over.metric) {
            Some(rule) => {
                if let Some(threshold) = over.threshold {
                    rule.threshold = threshold;
                }
                if let Some(last_for_secs) = over.last_for_secs {
                    rule.last_for_secs = last_for_secs;
                }
                if let Some(enabled) = over.enabled {
                    rule.enabled = enabled;
                }
            }
            None => {
                by_kind.insert(
                    over.metric,
                    Rule {
                        metric: over.metric,
                        threshold: over.threshold.unwrap_or(0.0),
                        last_for_secs: over.last_for_secs.unwrap_or(0),
                        enabled: over.enabled.unwrap_or(false),
                    },
                );
            }
        }
    }

    by_kind.into_values().collect()
}

/// Resolves the effective rule set for every node in one pass, once per
/// cycle. A node absent from `exceptions` gets the defaults unchanged.
pub fn effective_rules(
    defaults: &[Rule],
    exceptions: &HashMap<i64, Vec<RuleOverride>>,
    node_ids: impl IntoIterator<Item = i64>,
) -> HashMap<i64, Vec<Rule>> {
    node_ids
        .into_iter()
        .map(|node_id| {
            let overrides = exceptions
                .get(&node_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            (node_id, resolve_rules(defaults, overrides))
        })
        .collect()
}
