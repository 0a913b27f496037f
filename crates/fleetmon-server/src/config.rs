use fleetmon_common::types::{Rule, RuleOverride};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Dashboard base URL (e.g., `https://status.example.com`)
    pub endpoint: String,
    /// Dashboard API token, sent as the `Authorization` header
    pub token: String,
    #[serde(default)]
    pub check: CheckConfig,
    /// Bot transports keyed by bot id
    #[serde(default)]
    pub bots: HashMap<String, BotConfig>,
    /// 推送目标：bot id -> 私聊/群聊接收者
    #[serde(default)]
    pub send: HashMap<String, SendTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// 轮询间隔（秒）
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// 状态记录保留时长（秒）
    #[serde(default = "default_state_ttl_secs")]
    pub state_ttl_secs: u64,
    /// Restrict polling to nodes with this dashboard tag
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default = "default_state_path")]
    pub state_path: String,
    /// Directory receiving the raw snapshot dump of each cycle
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            state_ttl_secs: default_state_ttl_secs(),
            tag: None,
            state_path: default_state_path(),
            archive_dir: default_archive_dir(),
            locale: default_locale(),
            rules: RulesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Default rule set; one entry per metric kind to monitor
    #[serde(default)]
    pub items: Vec<Rule>,
    /// Per-node partial overrides, keyed by node id.
    /// Keys stay strings here (TOML map keys are strings); the scheduler
    /// parses them and ignores non-numeric ids.
    #[serde(default)]
    pub exception: HashMap<String, Vec<RuleOverride>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendTarget {
    #[serde(default)]
    pub private: Vec<i64>,
    #[serde(default)]
    pub group: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// OneBot HTTP endpoint (e.g., `http://127.0.0.1:3000`)
    pub endpoint: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

fn default_interval_secs() -> u64 {
    300
}

fn default_state_ttl_secs() -> u64 {
    3600
}

fn default_state_path() -> String {
    "data/state.db".to_string()
}

fn default_archive_dir() -> String {
    "data".to_string()
}

fn default_locale() -> String {
    "zh-CN".to_string()
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
