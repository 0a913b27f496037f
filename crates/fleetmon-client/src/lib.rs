//! Client for the fleet dashboard's HTTP metrics API.
//!
//! The dashboard is the single source of truth for node membership and
//! per-node resource usage: [`DashboardClient::list_nodes`] enumerates the
//! fleet (optionally filtered by tag) and [`DashboardClient::node_details`]
//! fetches the raw status records that become [`NodeSnapshot`]s for the
//! alert engine.
//!
//! [`NodeSnapshot`]: fleetmon_common::types::NodeSnapshot

pub mod client;
pub mod error;
pub mod models;

pub use client::DashboardClient;
pub use error::{ClientError, Result};
pub use models::{NodeDetail, NodeSummary};
