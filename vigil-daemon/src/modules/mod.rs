//! Module registry and initialization.
//!
//! Each vigil component is wrapped as a [`ModuleHandle`] that provides
//! uniform lifecycle management via the [`DynPipeline`] trait.
//!
//! The [`ModuleRegistry`] tracks all registered modules and supports
//! ordered start/stop operations.

pub mod detector;
pub mod stub;

use vigil_core::pipeline::{DynPipeline, HealthStatus};

#[cfg(test)]
use vigil_core::pipeline::BoxFuture;

/// A handle to a registered module.
///
/// Wraps a `Box<dyn DynPipeline>` with metadata (name, enabled flag).
pub struct ModuleHandle {
    /// Module name for logging and health reporting.
    pub name: String,
    /// Whether this module is enabled in configuration.
    pub enabled: bool,
    /// The module's pipeline implementation (start/stop/health_check).
    pub pipeline: Box<dyn DynPipeline>,
}

impl ModuleHandle {
    /// Create a new module handle.
    pub fn new(name: impl Into<String>, enabled: bool, pipeline: Box<dyn DynPipeline>) -> Self {
        Self {
            name: name.into(),
            enabled,
            pipeline,
        }
    }

    /// Check the module's health status.
    ///
    /// Disabled modules always report `Healthy` (they are not expected to run).
    #[allow(dead_code)] // Used in orchestrator health method
    pub async fn health_check(&self) -> HealthStatus {
        if !self.enabled {
            return HealthStatus::Healthy;
        }
        self.pipeline.health_check().await
    }
}

/// Registry of all vigil daemon modules.
///
/// Provides ordered start/stop and health check aggregation.
pub struct ModuleRegistry {
    /// Modules in registration order (producers before consumers).
    modules: Vec<ModuleHandle>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module.
    ///
    /// Modules should be registered in dependency order:
    /// producers first, consumers last.
    pub fn register(&mut self, handle: ModuleHandle) {
        self.modules.push(handle);
    }

    /// Start all enabled modules in registration order.
    ///
    /// Returns an error on the first module that fails to start.
    /// Already-started modules are NOT rolled back; the caller should
    /// invoke `stop_all` if partial startup is unacceptable.
    ///
    /// Each module start operation has a 30-second timeout to prevent indefinite hangs.
    ///
    /// Note: Module panics will propagate to the daemon orchestrator.
    /// Modules are expected to handle all errors gracefully and avoid panicking.
    pub async fn start_all(&mut self) -> anyhow::Result<()> {
        const START_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

        for handle in &mut self.modules {
            if !handle.enabled {
                tracing::debug!(module = %handle.name, "skipping disabled module");
                continue;
            }

            tracing::info!(module = %handle.name, "starting module");

            let start_result = tokio::time::timeout(START_TIMEOUT, handle.pipeline.start()).await;

            match start_result {
                Ok(Ok(())) => {
                    tracing::info!(module = %handle.name, "module started successfully");
                }
                Ok(Err(e)) => {
                    return Err(anyhow::anyhow!(
                        "failed to start module '{}': {}",
                        handle.name,
                        e
                    ));
                }
                Err(_) => {
                    return Err(anyhow::anyhow!(
                        "timeout starting module '{}' (exceeded {:?})",
                        handle.name,
                        START_TIMEOUT
                    ));
                }
            }
        }
        Ok(())
    }

    /// Stop all enabled modules in registration order.
    ///
    /// Logs errors but continues stopping remaining modules.
    ///
    /// Each module stop operation has a 30-second timeout to prevent indefinite hangs.
    ///
    /// Note: Module panics during stop will propagate to the daemon orchestrator.
    /// Modules are expected to handle all errors gracefully and avoid panicking.
    pub async fn stop_all(&mut self) -> anyhow::Result<()> {
        const STOP_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
        let mut errors = Vec::new();

        for handle in self.modules.iter_mut() {
            if !handle.enabled {
                continue;
            }

            tracing::info!(module = %handle.name, "stopping module");

            let stop_result = tokio::time::timeout(STOP_TIMEOUT, handle.pipeline.stop()).await;

            match stop_result {
                Ok(Ok(())) => {
                    tracing::info!(module = %handle.name, "module stopped successfully");
                }
                Ok(Err(e)) => {
                    tracing::error!(
                        module = %handle.name,
                        error = %e,
                        "failed to stop module"
                    );
                    errors.push(format!("{}: {}", handle.name, e));
                }
                Err(_) => {
                    tracing::warn!(
                        module = %handle.name,
                        timeout = ?STOP_TIMEOUT,
                        "timeout stopping module, continuing shutdown"
                    );
                    errors.push(format!("{}: timeout after {:?}", handle.name, STOP_TIMEOUT));
                }
            }
        }

        if !errors.is_empty() {
            return Err(anyhow::anyhow!(
                "errors stopping modules: {}",
                errors.join("; ")
            ));
        }

        Ok(())
    }

    /// Get health status for all modules.
    #[allow(dead_code)] // Used in orchestrator health method
    pub async fn health_statuses(&self) -> Vec<(String, bool, HealthStatus)> {
        let mut statuses = Vec::new();
        for handle in &self.modules {
            let status = handle.health_check().await;
            statuses.push((handle.name.clone(), handle.enabled, status));
        }
        statuses
    }

    /// Number of registered modules.
    pub fn count(&self) -> usize {
        self.modules.len()
    }

    /// Number of enabled modules.
    pub fn enabled_count(&self) -> usize {
        self.modules.iter().filter(|m| m.enabled).count()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
