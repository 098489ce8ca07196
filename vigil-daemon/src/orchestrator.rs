//! Module orchestration -- assembly and lifecycle management.
//!
//! The [`Orchestrator`] is the central coordinator of `vigil-daemon`.
//! It loads configuration, builds the enabled modules (the intrusion
//! detector plus stub collaborators), manages startup/shutdown
//! ordering, and runs the main event loop.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tokio::sync::broadcast;

use vigil_core::config::VigilConfig;

use crate::health::{DaemonHealth, ModuleHealth, aggregate_status};
use crate::modules::ModuleRegistry;

/// The main daemon orchestrator.
///
/// Manages the complete lifecycle of all vigil modules: configuration
/// loading, ordered startup, health monitoring, and graceful shutdown.
pub struct Orchestrator {
    /// Loaded and validated configuration.
    config: VigilConfig,
    /// Registry of all module handles (ordered for start/stop).
    modules: ModuleRegistry,
    /// Shutdown broadcast sender (signals all background tasks).
    #[allow(dead_code)] // reserved for future collaborator tasks that watch shutdown
    shutdown_tx: broadcast::Sender<()>,
    /// Daemon start time (for uptime reporting).
    #[allow(dead_code)] // Used in health method
    start_time: Instant,
}

impl Orchestrator {
    /// Load configuration and build the orchestrator.
    ///
    /// This performs the following steps:
    /// 1. Load `vigil.toml` and apply environment variable overrides
    /// 2. Validate the configuration
    /// 3. Initialize enabled modules
    ///
    /// # Arguments
    ///
    /// * `config_path` - Path to the `vigil.toml` configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or parsed
    /// - Configuration validation fails
    /// - Any enabled module fails to initialize
    #[allow(dead_code)] // Public API for tests
    pub async fn build(config_path: &Path) -> Result<Self> {
        let mut config = VigilConfig::from_file(config_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
        config.apply_env_overrides();
        Self::build_from_config(config).await
    }

    /// Build from an already-loaded configuration.
    ///
    /// Useful for testing or when config has already been loaded.
    pub async fn build_from_config(config: VigilConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        let (shutdown_tx, _) = broadcast::channel(16);

        let mut modules = ModuleRegistry::new();

        if let Some(handle) = crate::modules::detector::init(&config)? {
            modules.register(handle);
        }

        if let Some(handle) =
            crate::modules::stub::init_container_stats(config.collaborators.container_stats_enabled)
        {
            modules.register(handle);
        }
        if let Some(handle) =
            crate::modules::stub::init_http_api(config.collaborators.http_api_enabled)
        {
            modules.register(handle);
        }
        if let Some(handle) =
            crate::modules::stub::init_chat_bot(config.collaborators.chat_bot_enabled)
        {
            modules.register(handle);
        }

        tracing::info!(
            total_modules = modules.count(),
            enabled_modules = modules.enabled_count(),
            "orchestrator initialized"
        );

        Ok(Self {
            config,
            modules,
            shutdown_tx,
            start_time: Instant::now(),
        })
    }

    /// Start all enabled modules and enter the main event loop.
    ///
    /// This method blocks until a shutdown signal is received.
    ///
    /// # Shutdown Triggers
    ///
    /// - `SIGTERM` (from systemd, Docker, or `kill`)
    /// - `SIGINT` (Ctrl+C)
    pub async fn run(&mut self) -> Result<()> {
        // Write PID file if configured
        if !self.config.general.pid_file.is_empty() {
            let path = Path::new(&self.config.general.pid_file);
            write_pid_file(path)?;
        }

        // Start all modules
        tracing::info!("starting all enabled modules");
        if let Err(e) = self.modules.start_all().await {
            // Cleanup PID file on startup failure
            if !self.config.general.pid_file.is_empty() {
                let path = Path::new(&self.config.general.pid_file);
                remove_pid_file(path);
            }
            return Err(e);
        }

        // Main event loop
        tracing::info!("entering main event loop");
        let signal = wait_for_shutdown_signal().await?;
        tracing::info!(signal = signal, "shutdown signal received");

        // Initiate shutdown
        tracing::info!("broadcasting shutdown signal to all tasks");
        let _ = self.shutdown_tx.send(());

        // Stop all modules
        self.shutdown().await?;

        // Remove PID file
        if !self.config.general.pid_file.is_empty() {
            let path = Path::new(&self.config.general.pid_file);
            remove_pid_file(path);
        }

        Ok(())
    }

    /// Perform graceful shutdown of all modules.
    async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("stopping all modules");
        self.modules.stop_all().await
    }

    /// Get the current aggregated health status.
    #[allow(dead_code)] // Future health endpoint
    pub async fn health(&self) -> DaemonHealth {
        let statuses = self.modules.health_statuses().await;
        let modules: Vec<ModuleHealth> = statuses
            .into_iter()
            .map(|(name, enabled, status)| ModuleHealth {
                name,
                enabled,
                status,
            })
            .collect();

        let overall_status = aggregate_status(&modules);
        let uptime_secs = self.start_time.elapsed().as_secs();

        DaemonHealth {
            status: overall_status,
            uptime_secs,
            modules,
        }
    }

    /// Get a reference to the loaded configuration.
    #[allow(dead_code)] // Public API for introspection
    pub fn config(&self) -> &VigilConfig {
        &self.config
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Returns the name of the signal that triggered the shutdown.
///
/// # Errors
///
/// Returns an error if signal handlers cannot be installed.
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Write the current process PID to a file.
///
/// Used to prevent duplicate daemon instances.
///
/// # Errors
///
/// Returns an error if the PID file cannot be written.
fn write_pid_file(path: &Path) -> Result<()> {
    use std::fs::{self, OpenOptions};
    use std::io::{ErrorKind, Write};

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pid = std::process::id();

    // Atomically create file only if it doesn't exist (eliminates TOCTOU race)
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            // File already exists, read the existing PID for error message
            let existing_pid = fs::read_to_string(path).unwrap_or_else(|_| "unknown".to_string());
            return Err(anyhow::anyhow!(
                "PID file {} already exists with PID: {}. Is another instance running?",
                path.display(),
                existing_pid.trim()
            ));
        }
        Err(e) => return Err(e.into()),
    };

    writeln!(file, "{}", pid)?;

    tracing::info!(pid = pid, path = %path.display(), "PID file written");
    Ok(())
}

/// Remove the PID file on daemon shutdown.
///
/// Logs a warning but does not fail if the file cannot be removed.
fn remove_pid_file(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "failed to remove PID file"
        );
    } else {
        tracing::info!(path = %path.display(), "PID file removed");
    }
}
