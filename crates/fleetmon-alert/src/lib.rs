//! Alert evaluation engine for per-node resource metrics.
//!
//! Converts a batch of raw metric snapshots into debounced, deduplicated
//! alert and recovery events. Each metric on each node runs a two-state
//! debounce machine: a value over threshold is tracked from its first
//! breaching sample, confirmed (one `fire` event) once it has lasted longer
//! than the rule's `last_for_secs`, and cleared (one `recover` event, only
//! from the confirmed state) when it drops back to or below the threshold.
//! Tracking state is persisted between cycles through a
//! [`fleetmon_storage::StateStore`].

pub mod cycle;
pub mod evaluator;
pub mod resolver;


pub use cycle::{run_cycle, CycleOptions, CycleOutcome, NodeFailure};
pub use evaluator::{evaluate, Evaluation, MetricEvent};
pub use resolver::{effective_rules, resolve_rules};
