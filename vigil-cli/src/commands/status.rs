//! `vigil status` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use vigil_core::config::VigilConfig;

use crate::cli::StatusArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `status` command.
pub async fn execute(
    args: StatusArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut config = VigilConfig::from_file(config_path).await?;
    config.apply_env_overrides();

    let report = build_status_report(&config, args.verbose);

    writer.render(&report)?;

    Ok(())
}

/// Build a status report from configuration and daemon state.
///
/// Queries daemon status via PID file and constructs module-level health
/// information based on the enabled modules in the configuration.
///
/// # Arguments
///
/// * `config` - Loaded Vigil configuration
/// * `verbose` - Include detailed per-module configuration in output
///
/// # Returns
///
/// Returns a `StatusReport` containing daemon state and module health information.
fn build_status_report(config: &VigilConfig, verbose: bool) -> StatusReport {
    // Check if daemon is running by checking PID file
    let (daemon_running, uptime_secs) = check_daemon_status(&config.general.pid_file);

    let mut modules = Vec::new();

    // Intrusion detector module
    if config.detector.enabled {
        modules.push(ModuleStatus {
            name: "detector".to_owned(),
            enabled: true,
            health: if daemon_running {
                "running".to_owned()
            } else {
                "stopped".to_owned()
            },
            details: if verbose {
                Some(format!(
                    "interface={}, thresholds=syn:{}/http:{}/udp:{}, expiry={}s",
                    config.detector.interface,
                    config.detector.threshold_syn,
                    config.detector.threshold_http,
                    config.detector.threshold_udp,
                    config.detector.attack_expiry_secs
                ))
            } else {
                None
            },
        });
    }

    // Container stats collaborator stub
    if config.collaborators.container_stats_enabled {
        modules.push(ModuleStatus {
            name: "container-stats".to_owned(),
            enabled: true,
            health: if daemon_running {
                "running".to_owned()
            } else {
                "stopped".to_owned()
            },
            details: None,
        });
    }

    // HTTP API collaborator stub
    if config.collaborators.http_api_enabled {
        modules.push(ModuleStatus {
            name: "http-api".to_owned(),
            enabled: true,
            health: if daemon_running {
                "running".to_owned()
            } else {
                "stopped".to_owned()
            },
            details: if verbose {
                Some(format!("bind={}", config.collaborators.http_api_bind))
            } else {
                None
            },
        });
    }

    // Chat bot collaborator stub
    if config.collaborators.chat_bot_enabled {
        modules.push(ModuleStatus {
            name: "chat-bot".to_owned(),
            enabled: true,
            health: if daemon_running {
                "running".to_owned()
            } else {
                "stopped".to_owned()
            },
            details: None,
        });
    }

    StatusReport {
        daemon_running,
        uptime_secs,
        modules,
    }
}

/// Check if daemon is running by reading PID file and checking process existence.
fn check_daemon_status(pid_file: &str) -> (bool, Option<u64>) {
    let pid_path = std::path::Path::new(pid_file);

    // Read PID file directly without exists() check to avoid TOCTOU race.
    // If the file doesn't exist, read_to_string will return an error.
    let pid_content = match std::fs::read_to_string(pid_path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() == std::io::ErrorKind::NotFound {
                debug!(pid_file, "pid file does not exist");
            } else {
                warn!(pid_file, error = %e, "failed to read pid file");
            }
            return (false, None);
        }
    };

    let pid = match pid_content.trim().parse::<u32>() {
        Ok(p) => p,
        Err(e) => {
            warn!(pid_file, error = %e, "failed to parse pid");
            return (false, None);
        }
    };

    // Check if process is alive
    let is_running = is_process_alive(pid);

    // Uptime estimation is not trivial without querying the process
    // For now, just return None (future: add health API endpoint)
    (is_running, None)
}

/// Check if a process with the given PID is alive.
#[cfg(unix)]
fn is_process_alive(pid: u32) -> bool {
    use std::io::ErrorKind;

    // Convert pid to pid_t with bounds checking
    let pid_t = match libc::pid_t::try_from(pid) {
        Ok(p) => p,
        Err(_) => {
            // PID exceeds platform pid_t range (e.g., pid > i32::MAX on most platforms)
            warn!(pid, "PID exceeds platform pid_t range");
            return false;
        }
    };

    // Send signal 0 to check if process exists
    // SAFETY: kill(2) is safe when:
    //   1. The pid_t value is valid (checked above via try_from)
    //   2. Signal 0 performs only an existence check without affecting the process
    //   3. The function is extern C and does not violate memory safety
    //   4. Note: PID recycling means this may refer to a different process than originally
    //      intended, but this is not a safety violation, only a correctness consideration
    let result = unsafe { libc::kill(pid_t, 0) };

    if result == 0 {
        true
    } else {
        let err = std::io::Error::last_os_error();
        match err.kind() {
            ErrorKind::PermissionDenied => true, // Process exists but we can't signal it
            _ => false,
        }
    }
}

#[cfg(not(unix))]
fn is_process_alive(_pid: u32) -> bool {
    warn!("process liveness check not supported on this platform");
    false
}

/// Status report containing daemon state and module health.
///
/// This structure is serialized to JSON or rendered as text depending on output format.
#[derive(Serialize)]
pub struct StatusReport {
    /// Whether the daemon process is currently running (based on PID file check)
    pub daemon_running: bool,
    /// Daemon uptime in seconds, or None if unavailable
    pub uptime_secs: Option<u64>,
    /// Health status of each enabled module
    pub modules: Vec<ModuleStatus>,
}

/// Health status of a single module.
#[derive(Serialize)]
pub struct ModuleStatus {
    /// Module name (detector, container-stats, http-api, chat-bot)
    pub name: String,
    /// Whether the module is enabled in configuration
    pub enabled: bool,
    /// Health state: "running" | "stopped" | "degraded"
    pub health: String,
    /// Optional verbose configuration details (only when --verbose flag is used)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Render for StatusReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if self.daemon_running {
            writeln!(
                w,
                "Daemon: {} (uptime: {})",
                "running".green().bold(),
                self.uptime_secs
                    .map(|s| format!("{}s", s))
                    .unwrap_or_else(|| "unknown".to_owned())
            )?;
        } else {
            writeln!(w, "Daemon: {}", "not running".red().bold())?;
        }

        writeln!(w)?;
        writeln!(w, "{:<20} {:<10} Health", "Module", "Enabled")?;
        writeln!(w, "{}", "-".repeat(60))?;

        for m in &self.modules {
            let enabled_str = if m.enabled { "yes" } else { "no" };
            let health_colored = match m.health.as_str() {
                "running" => m.health.green(),
                "stopped" => m.health.yellow(),
                _ => m.health.normal(),
            };

            writeln!(w, "{:<20} {:<10} {}", m.name, enabled_str, health_colored)?;

            if let Some(details) = &m.details {
                writeln!(w, "  {}", details.dimmed())?;
            }
        }

        Ok(())
    }
}
