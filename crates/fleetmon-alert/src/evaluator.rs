use fleetmon_common::types::{BreachEntry, EventKind, MetricKind, Rule};

/// An event scoped to a single metric. The cycle orchestrator attaches node
/// identity before handing events to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEvent {
    pub metric: MetricKind,
    pub kind: EventKind,
    pub current_value: f64,
    pub breach_duration_secs: u64,
}

/// Outcome of evaluating one metric for one node: the replacement tracking
/// entry (`None` clears tracking) and at most one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub entry: Option<BreachEntry>,
    pub event: Option<MetricEvent>,
}

/// Runs one step of the per-metric debounce machine.
///
/// States: Clear (no entry) → Tracking (entry, unconfirmed) → Confirmed
/// (entry, confirmed). A `fire` event is emitted exactly once, on the
/// Tracking→Confirmed transition; a `recover` event is emitted exactly once,
/// on the Confirmed→Clear transition. Tracking→Clear emits nothing: a spike
/// that never outlasted `last_for_secs` was never reported, so there is
/// nothing to retract.
///
/// The prior entry is never mutated; a replacement is computed.
pub fn evaluate(
    current_value: f64,
    rule: &Rule,
    prior: Option<&BreachEntry>,
    now_secs: i64,
) -> Evaluation {
    if current_value > rule.threshold {
        let breach_started_at = prior.map(|e| e.breach_started_at).unwrap_or(now_secs);
        let elapsed = now_secs - breach_started_at;

        if elapsed > rule.last_for_secs as i64 {
            let already_confirmed = prior.is_some_and(|e| e.confirmed);
            let event = if already_confirmed {
                None
            } else {
                Some(MetricEvent {
                    metric: rule.metric,
                    kind: EventKind::Fire,
                    current_value,
                    breach_duration_secs: elapsed.max(0) as u64,
                })
            };
            Evaluation {
                entry: Some(BreachEntry {
                    metric: rule.metric,
                    breach_started_at,
                    confirmed: true,
                }),
                event,
            }
        } else {
            // Over threshold but not long enough yet: track, don't report.
            Evaluation {
                entry: Some(BreachEntry {
                    metric: rule.metric,
                    breach_started_at,
                    confirmed: false,
                }),
                event: None,
            }
        }
    } else {
        let event = prior.filter(|e| e.confirmed).map(|_| MetricEvent {
            metric: rule.metric,
            kind: EventKind::Recover,
            current_value,
            breach_duration_secs: 0,
        });
        Evaluation { entry: None, event }
    }
}
