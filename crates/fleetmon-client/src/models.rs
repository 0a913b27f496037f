use crate::error::{ClientError, Result};
use fleetmon_common::types::{NodeMetrics, NodeSnapshot};
use serde::Deserialize;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Standard dashboard response envelope: `{ code, message, result }`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwraps the envelope: non-zero code is a logical API error, a missing
    /// payload on success is malformed.
    pub fn into_result(self) -> Result<T> {
        if self.code != 0 {
            return Err(ClientError::Api {
                code: self.code,
                message: self.message,
            });
        }
        self.result.ok_or(ClientError::EmptyResult)
    }
}

/// One row of the node list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub last_active: String,
}

/// Instantaneous usage counters as reported by the node agent.
/// Network speeds are bytes per second.
#[derive(Debug, Clone, Copy, Default, Deserialize, serde::Serialize)]
pub struct NodeStatus {
    #[serde(rename = "CPU", default)]
    pub cpu: f64,
    #[serde(rename = "MemUsed", default)]
    pub mem_used: f64,
    #[serde(rename = "DiskUsed", default)]
    pub disk_used: f64,
    #[serde(rename = "NetInSpeed", default)]
    pub net_in_speed: f64,
    #[serde(rename = "NetOutSpeed", default)]
    pub net_out_speed: f64,
}

/// Static host capacity totals, needed to turn used bytes into rates.
#[derive(Debug, Clone, Copy, Default, Deserialize, serde::Serialize)]
pub struct HostInfo {
    #[serde(rename = "MemTotal", default)]
    pub mem_total: f64,
    #[serde(rename = "DiskTotal", default)]
    pub disk_total: f64,
}

/// Raw detail record for one node, as returned by the details endpoint.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct NodeDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default)]
    pub host: HostInfo,
}

impl NodeDetail {
    /// Derives the evaluation-ready snapshot:
    /// memory/disk as used/total ratios, network speeds as MB/s.
    /// A zero capacity total yields a 0.0 rate instead of NaN.
    pub fn to_snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            id: self.id,
            name: self.name.clone(),
            metrics: NodeMetrics {
                cpu: self.status.cpu,
                memory_rate: ratio(self.status.mem_used, self.host.mem_total),
                disk_rate: ratio(self.status.disk_used, self.host.disk_total),
                upload_mbs: self.status.net_out_speed / BYTES_PER_MB,
                download_mbs: self.status.net_in_speed / BYTES_PER_MB,
            },
        }
    }
}

fn ratio(used: f64, total: f64) -> f64 {
    if total > 0.0 {
        used / total
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_decodes_dashboard_payload() {
        let json = r#"{
            "id": 3,
            "name": "hk-edge",
            "status": {
                "CPU": 37.5,
                "MemUsed": 2147483648,
                "DiskUsed": 32212254720,
                "NetInSpeed": 1048576,
                "NetOutSpeed": 524288
            },
            "host": {
                "MemTotal": 4294967296,
                "DiskTotal": 107374182400
            }
        }"#;

        let detail: NodeDetail = serde_json::from_str(json).unwrap();
        let snap = detail.to_snapshot();
        assert_eq!(snap.id, 3);
        assert_eq!(snap.metrics.cpu, 37.5);
        assert_eq!(snap.metrics.memory_rate, 0.5);
        assert_eq!(snap.metrics.disk_rate, 0.3);
        assert_eq!(snap.metrics.download_mbs, 1.0);
        assert_eq!(snap.metrics.upload_mbs, 0.5);
    }

    #[test]
    fn zero_totals_do_not_produce_nan() {
        let detail = NodeDetail {
            id: 1,
            name: "fresh".into(),
            status: NodeStatus {
                mem_used: 1024.0,
                ..Default::default()
            },
            host: HostInfo::default(),
        };
        let snap = detail.to_snapshot();
        assert_eq!(snap.metrics.memory_rate, 0.0);
        assert_eq!(snap.metrics.disk_rate, 0.0);
    }

    #[test]
    fn envelope_maps_logical_errors() {
        let json = r#"{ "code": 403, "message": "permission denied", "result": null }"#;
        let resp: ApiResponse<Vec<NodeSummary>> = serde_json::from_str(json).unwrap();
        let err = resp.into_result().unwrap_err();
        assert!(matches!(err, ClientError::Api { code: 403, .. }));
    }

    #[test]
    fn envelope_success_without_result_is_malformed() {
        let json = r#"{ "code": 0, "result": null }"#;
        let resp: ApiResponse<Vec<NodeSummary>> = serde_json::from_str(json).unwrap();
        assert!(matches!(
            resp.into_result().unwrap_err(),
            ClientError::EmptyResult
        ));
    }
}
