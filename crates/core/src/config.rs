//! Configuration management — vigil.toml parsing and runtime settings.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, VigilError};

/// Top-level Vigil configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    /// General settings.
    pub general: GeneralConfig,
    /// Intrusion detector settings.
    pub detector: DetectorConfig,
    /// External collaborator settings.
    pub collaborators: CollaboratorsConfig,
    /// Prometheus exposition settings.
    pub metrics: MetricsConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level.
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: String,
    /// Data directory.
    pub data_dir: String,
    /// PID file path.
    pub pid_file: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
            data_dir: "/var/lib/vigil".to_owned(),
            pid_file: "/var/run/vigil/vigil.pid".to_owned(),
        }
    }
}

/// Intrusion detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Whether the detector is enabled.
    pub enabled: bool,
    /// Network interface to watch.
    pub interface: String,
    /// SYN flood threshold (packets per reset window).
    pub threshold_syn: u64,
    /// HTTP flood threshold.
    pub threshold_http: u64,
    /// UDP flood threshold.
    pub threshold_udp: u64,
    /// Idle time an incident may go without reinforcement before closing (seconds).
    pub attack_expiry_secs: u64,
    /// Counter reset cadence (seconds).
    pub cleanup_interval_secs: u64,
    /// Whitelist CIDR list (source IPs in this list always pass).
    pub whitelist: Vec<String>,
    /// JSON file path where closed incidents are recorded.
    pub persistence_path: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interface: "eth0".to_owned(),
            threshold_syn: 100,
            threshold_http: 200,
            threshold_udp: 400,
            attack_expiry_secs: 10,
            cleanup_interval_secs: 60,
            whitelist: Vec::new(),
            persistence_path: "/var/lib/vigil/incidents.json".to_owned(),
        }
    }
}

/// External collaborator settings — container stats poller, HTTP API, chat-bot notifier.
///
/// These collaborators are assumed to be implemented outside this crate;
/// this only decides whether the daemon turns each module on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaboratorsConfig {
    /// Whether the container resource stats poller is enabled.
    pub container_stats_enabled: bool,
    /// Whether the HTTP API server is enabled.
    pub http_api_enabled: bool,
    /// HTTP API bind address.
    pub http_api_bind: String,
    /// Whether chat-bot notification is enabled.
    pub chat_bot_enabled: bool,
}

impl Default for CollaboratorsConfig {
    fn default() -> Self {
        Self {
            container_stats_enabled: false,
            http_api_enabled: false,
            http_api_bind: "127.0.0.1:8080".to_owned(),
            chat_bot_enabled: false,
        }
    }
}

/// Prometheus exposition endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Whether the endpoint is enabled.
    pub enabled: bool,
    /// Bind address (host part).
    pub listen_addr: String,
    /// Bind port.
    pub port: u16,
    /// Metrics exposition path.
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9898,
            endpoint: "/metrics".to_owned(),
        }
    }
}

impl VigilConfig {
    /// Parses config from a TOML string. Unknown sections/fields are ignored.
    pub fn parse(content: &str) -> Result<Self, VigilError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseFailed { reason: e.to_string() }.into())
    }

    /// Reads and parses config from a file.
    pub async fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, VigilError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|_| {
            VigilError::Config(ConfigError::FileNotFound {
                path: path.display().to_string(),
            })
        })?;
        Self::parse(&content)
    }

    /// Validates the logical correctness of the configured values.
    ///
    /// TOML parsing can succeed while the values themselves make no sense
    /// (zero thresholds, an empty interface name) — this is where those are caught.
    pub fn validate(&self) -> Result<(), VigilError> {
        if self.detector.enabled && self.detector.interface.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "detector.interface".to_owned(),
                reason: "must not be empty when detector is enabled".to_owned(),
            }
            .into());
        }
        if self.detector.threshold_syn == 0 {
            return Err(ConfigError::InvalidValue {
                field: "detector.threshold_syn".to_owned(),
                reason: "must be greater than zero".to_owned(),
            }
            .into());
        }
        if self.detector.threshold_http == 0 {
            return Err(ConfigError::InvalidValue {
                field: "detector.threshold_http".to_owned(),
                reason: "must be greater than zero".to_owned(),
            }
            .into());
        }
        if self.detector.threshold_udp == 0 {
            return Err(ConfigError::InvalidValue {
                field: "detector.threshold_udp".to_owned(),
                reason: "must be greater than zero".to_owned(),
            }
            .into());
        }
        if self.detector.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "detector.cleanup_interval_secs".to_owned(),
                reason: "must be greater than zero".to_owned(),
            }
            .into());
        }
        for entry in &self.detector.whitelist {
            if parse_cidr(entry).is_none() {
                return Err(ConfigError::InvalidValue {
                    field: "detector.whitelist".to_owned(),
                    reason: format!("'{entry}' is not a valid CIDR"),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Overrides TOML values with `VIGIL_<SECTION>_<FIELD>` environment variables.
    ///
    /// Takes precedence over the TOML value; leaves the existing value alone
    /// when the variable is unset. Vector fields are read as comma-separated strings.
    pub fn apply_env_overrides(&mut self) {
        if let Some(v) = env_var("VIGIL_GENERAL_LOG_LEVEL") {
            self.general.log_level = v;
        }
        if let Some(v) = env_var("VIGIL_GENERAL_LOG_FORMAT") {
            self.general.log_format = v;
        }
        if let Some(v) = env_var("VIGIL_GENERAL_DATA_DIR") {
            self.general.data_dir = v;
        }
        if let Some(v) = env_var("VIGIL_GENERAL_PID_FILE") {
            self.general.pid_file = v;
        }

        if let Some(v) = env_var("VIGIL_DETECTOR_ENABLED") {
            if let Ok(b) = v.parse() {
                self.detector.enabled = b;
            }
        }
        if let Some(v) = env_var("VIGIL_DETECTOR_INTERFACE") {
            self.detector.interface = v;
        }
        if let Some(v) = env_var("VIGIL_DETECTOR_THRESHOLD_SYN") {
            if let Ok(n) = v.parse() {
                self.detector.threshold_syn = n;
            }
        }
        if let Some(v) = env_var("VIGIL_DETECTOR_THRESHOLD_HTTP") {
            if let Ok(n) = v.parse() {
                self.detector.threshold_http = n;
            }
        }
        if let Some(v) = env_var("VIGIL_DETECTOR_THRESHOLD_UDP") {
            if let Ok(n) = v.parse() {
                self.detector.threshold_udp = n;
            }
        }
        if let Some(v) = env_var("VIGIL_DETECTOR_ATTACK_EXPIRY_SECS") {
            if let Ok(n) = v.parse() {
                self.detector.attack_expiry_secs = n;
            }
        }
        if let Some(v) = env_var("VIGIL_DETECTOR_CLEANUP_INTERVAL_SECS") {
            if let Ok(n) = v.parse() {
                self.detector.cleanup_interval_secs = n;
            }
        }
        if let Some(v) = env_var("VIGIL_DETECTOR_WHITELIST") {
            self.detector.whitelist = v.split(',').map(|s| s.trim().to_owned()).collect();
        }
        if let Some(v) = env_var("VIGIL_DETECTOR_PERSISTENCE_PATH") {
            self.detector.persistence_path = v;
        }

        if let Some(v) = env_var("VIGIL_COLLABORATORS_CONTAINER_STATS_ENABLED") {
            if let Ok(b) = v.parse() {
                self.collaborators.container_stats_enabled = b;
            }
        }
        if let Some(v) = env_var("VIGIL_COLLABORATORS_HTTP_API_ENABLED") {
            if let Ok(b) = v.parse() {
                self.collaborators.http_api_enabled = b;
            }
        }
        if let Some(v) = env_var("VIGIL_COLLABORATORS_HTTP_API_BIND") {
            self.collaborators.http_api_bind = v;
        }
        if let Some(v) = env_var("VIGIL_COLLABORATORS_CHAT_BOT_ENABLED") {
            if let Ok(b) = v.parse() {
                self.collaborators.chat_bot_enabled = b;
            }
        }

        if let Some(v) = env_var("VIGIL_METRICS_ENABLED") {
            if let Ok(b) = v.parse() {
                self.metrics.enabled = b;
            }
        }
        if let Some(v) = env_var("VIGIL_METRICS_LISTEN_ADDR") {
            self.metrics.listen_addr = v;
        }
        if let Some(v) = env_var("VIGIL_METRICS_PORT") {
            if let Ok(n) = v.parse() {
                self.metrics.port = n;
            }
        }
        if let Some(v) = env_var("VIGIL_METRICS_ENDPOINT") {
            self.metrics.endpoint = v;
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parses a `a.b.c.d/n` CIDR string. Returns `None` on any malformed input.
fn parse_cidr(s: &str) -> Option<(std::net::Ipv4Addr, u8)> {
    let (addr, prefix) = s.split_once('/')?;
    let addr: std::net::Ipv4Addr = addr.trim().parse().ok()?;
    let prefix: u8 = prefix.trim().parse().ok()?;
    if prefix > 32 {
        return None;
    }
    Some((addr, prefix))
}
