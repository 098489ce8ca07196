//! Test configuration builder for E2E tests.
//!
//! Provides [`TestConfigBuilder`] for creating `VigilConfig` instances
//! with fine-grained control over which modules are enabled and with what settings.

use std::io::Write;
use std::path::PathBuf;

use vigil_core::config::VigilConfig;

/// Builder for constructing test-friendly `VigilConfig` instances.
///
/// By default, all modules are **disabled** and settings use safe test defaults
/// (e.g., empty PID file path, temp data directory).
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .detector(true)
///     .http_api(true)
///     .build();
/// ```
#[allow(dead_code)]
pub struct TestConfigBuilder {
    config: VigilConfig,
}

#[allow(dead_code)]
impl TestConfigBuilder {
    /// Create a new builder with all modules disabled and test-safe defaults.
    pub fn new() -> Self {
        let mut config = VigilConfig::default();

        // Override defaults for test safety
        config.general.pid_file = String::new(); // No PID file in tests
        config.general.data_dir = std::env::temp_dir()
            .join("vigil-test")
            .to_string_lossy()
            .into_owned();

        // Disable all modules by default
        config.detector.enabled = false;
        config.collaborators.container_stats_enabled = false;
        config.collaborators.http_api_enabled = false;
        config.collaborators.chat_bot_enabled = false;
        config.metrics.enabled = false;

        Self { config }
    }

    /// Enable or disable the intrusion detector module.
    pub fn detector(mut self, enabled: bool) -> Self {
        self.config.detector.enabled = enabled;
        if enabled {
            // Provide valid defaults for an enabled detector
            self.config.detector.interface = "lo".to_owned();
        }
        self
    }

    /// Enable or disable the container-stats collaborator stub.
    pub fn container_stats(mut self, enabled: bool) -> Self {
        self.config.collaborators.container_stats_enabled = enabled;
        self
    }

    /// Enable or disable the HTTP API collaborator stub.
    pub fn http_api(mut self, enabled: bool) -> Self {
        self.config.collaborators.http_api_enabled = enabled;
        self
    }

    /// Enable or disable the chat-bot collaborator stub.
    pub fn chat_bot(mut self, enabled: bool) -> Self {
        self.config.collaborators.chat_bot_enabled = enabled;
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: &str) -> Self {
        self.config.general.log_level = level.to_owned();
        self
    }

    /// Set the log format.
    pub fn log_format(mut self, format: &str) -> Self {
        self.config.general.log_format = format.to_owned();
        self
    }

    /// Set the PID file path.
    pub fn pid_file(mut self, path: &str) -> Self {
        self.config.general.pid_file = path.to_owned();
        self
    }

    /// Set the detector's whitelist CIDR entries.
    pub fn whitelist(mut self, entries: Vec<String>) -> Self {
        self.config.detector.whitelist = entries;
        self
    }

    /// Set the detector's SYN/HTTP/UDP thresholds.
    pub fn thresholds(mut self, syn: u64, http: u64, udp: u64) -> Self {
        self.config.detector.threshold_syn = syn;
        self.config.detector.threshold_http = http;
        self.config.detector.threshold_udp = udp;
        self
    }

    /// Set the detector's attack expiry window in seconds.
    pub fn attack_expiry_secs(mut self, secs: u64) -> Self {
        self.config.detector.attack_expiry_secs = secs;
        self
    }

    /// Set the detector's network interface.
    pub fn detector_interface(mut self, interface: &str) -> Self {
        self.config.detector.interface = interface.to_owned();
        self
    }

    /// Get mutable access to the underlying config for advanced customization.
    pub fn config_mut(&mut self) -> &mut VigilConfig {
        &mut self.config
    }

    /// Build and return the `VigilConfig`.
    ///
    /// Note: This does NOT call `validate()`. Call `build_validated()` if you
    /// need a validated config.
    pub fn build(self) -> VigilConfig {
        self.config
    }

    /// Build, validate, and return the `VigilConfig`.
    ///
    /// # Panics
    ///
    /// Panics if the configuration fails validation.
    pub fn build_validated(self) -> VigilConfig {
        let config = self.config;
        config
            .validate()
            .expect("TestConfigBuilder produced invalid config");
        config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a `VigilConfig` to a temporary TOML file and return its path.
///
/// Uses `tempfile::NamedTempFile` which is automatically cleaned up on drop.
/// The caller must keep the returned `NamedTempFile` alive for the duration of the test.
///
/// # Panics
///
/// Panics if serialization or file writing fails.
#[allow(dead_code)]
pub fn write_config_to_tempfile(config: &VigilConfig) -> (tempfile::NamedTempFile, PathBuf) {
    let toml_str = toml::to_string_pretty(config).expect("failed to serialize config to TOML");
    let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
    file.write_all(toml_str.as_bytes())
        .expect("failed to write config to temp file");
    file.flush().expect("failed to flush temp file");
    let path = file.path().to_path_buf();
    (file, path)
}
