use serde::{Deserialize, Serialize};

/// The five per-node resource metrics the monitor evaluates.
///
/// This is a closed set; `ALL` lists the members in evaluation order, which
/// is also the order events for one node appear in a cycle report.
///
/// # Examples
///
/// ```
/// use fleetmon_common::types::MetricKind;
///
/// let kind: MetricKind = "upload_speed".parse().unwrap();
/// assert_eq!(kind, MetricKind::UploadSpeed);
/// assert_eq!(kind.to_string(), "upload_speed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Cpu,
    Memory,
    Disk,
    UploadSpeed,
    DownloadSpeed,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Cpu,
        MetricKind::Memory,
        MetricKind::Disk,
        MetricKind::UploadSpeed,
        MetricKind::DownloadSpeed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Memory => "memory",
            MetricKind::Disk => "disk",
            MetricKind::UploadSpeed => "upload_speed",
            MetricKind::DownloadSpeed => "download_speed",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(MetricKind::Cpu),
            "memory" => Ok(MetricKind::Memory),
            "disk" => Ok(MetricKind::Disk),
            "upload_speed" => Ok(MetricKind::UploadSpeed),
            "download_speed" => Ok(MetricKind::DownloadSpeed),
            _ => Err(format!("unknown metric kind: {s}")),
        }
    }
}

/// 单个指标的告警规则
///
/// 阈值单位随指标而定：CPU 为百分比（0–100），内存/磁盘为占用率（0–1），
/// 上传/下载速度为 MB/s。监控端不做单位归一化，快照提供什么单位就比较什么单位。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub metric: MetricKind,
    pub threshold: f64,
    /// 超过阈值需持续多少秒才确认告警
    pub last_for_secs: u64,
    pub enabled: bool,
}

/// Per-node partial rule: present fields override the default rule for the
/// same metric kind, absent fields keep the default's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOverride {
    pub metric: MetricKind,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub last_for_secs: Option<u64>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// 一次轮询得到的单节点指标值
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    /// CPU 占用（百分比，0–100）
    pub cpu: f64,
    /// 内存占用率（0–1）
    pub memory_rate: f64,
    /// 磁盘占用率（0–1）
    pub disk_rate: f64,
    /// 上传速度（MB/s）
    pub upload_mbs: f64,
    /// 下载速度（MB/s）
    pub download_mbs: f64,
}

/// One node's metric snapshot for a single poll cycle. Immutable input to
/// the evaluation cycle; produced by the dashboard client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: i64,
    pub name: String,
    pub metrics: NodeMetrics,
}

impl NodeSnapshot {
    /// Selects the value for one metric kind.
    pub fn metric(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Cpu => self.metrics.cpu,
            MetricKind::Memory => self.metrics.memory_rate,
            MetricKind::Disk => self.metrics.disk_rate,
            MetricKind::UploadSpeed => self.metrics.upload_mbs,
            MetricKind::DownloadSpeed => self.metrics.download_mbs,
        }
    }
}

/// Per-metric breach tracking, persisted between cycles.
///
/// `confirmed` means a fire event has been emitted for this breach episode
/// and no recovery has been emitted yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreachEntry {
    pub metric: MetricKind,
    /// 越限开始时间（秒级 Unix 时间戳）
    pub breach_started_at: i64,
    pub confirmed: bool,
}

/// Durable alert state for one node. At most one entry per metric kind; the
/// whole record is deleted from the store when no metric is breaching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertState {
    pub node_id: i64,
    #[serde(default)]
    pub entries: Vec<BreachEntry>,
}

impl AlertState {
    pub fn new(node_id: i64) -> Self {
        Self {
            node_id,
            entries: Vec::new(),
        }
    }

    /// Looks up the tracked entry for one metric kind, if any.
    pub fn entry(&self, kind: MetricKind) -> Option<&BreachEntry> {
        self.entries.iter().find(|e| e.metric == kind)
    }
}

/// Whether an event reports a breach starting or ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Fire,
    Recover,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Fire => write!(f, "fire"),
            EventKind::Recover => write!(f, "recover"),
        }
    }
}

/// One state transition produced by an evaluation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub node_id: i64,
    pub node_name: String,
    pub metric: MetricKind,
    pub kind: EventKind,
    pub current_value: f64,
    /// 已持续秒数；recover 事件恒为 0
    pub breach_duration_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_kind_round_trips_through_serde() {
        for kind in MetricKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let back: MetricKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn alert_state_entry_lookup() {
        let state = AlertState {
            node_id: 7,
            entries: vec![BreachEntry {
                metric: MetricKind::Disk,
                breach_started_at: 1_700_000_000,
                confirmed: false,
            }],
        };
        assert!(state.entry(MetricKind::Disk).is_some());
        assert!(state.entry(MetricKind::Cpu).is_none());
    }

    #[test]
    fn snapshot_metric_selection() {
        let snap = NodeSnapshot {
            id: 1,
            name: "edge-01".into(),
            metrics: NodeMetrics {
                cpu: 42.0,
                memory_rate: 0.5,
                disk_rate: 0.9,
                upload_mbs: 1.5,
                download_mbs: 12.0,
            },
        };
        assert_eq!(snap.metric(MetricKind::Cpu), 42.0);
        assert_eq!(snap.metric(MetricKind::Disk), 0.9);
        assert_eq!(snap.metric(MetricKind::DownloadSpeed), 12.0);
    }
}
