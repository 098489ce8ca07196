//! Pipeline trait — module lifecycle contract.
//!
//! [`Pipeline`] is the lifecycle interface every long-running module in the
//! daemon implements: start, stop, and report health. `vigil-daemon` drives
//! every module through it uniformly, regardless of what the module does
//! internally.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::VigilError;

/// dyn-compatible future alias.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Lifecycle trait implemented by every long-running module.
///
/// Uses return-position `impl Future` so implementors can write plain
/// `async fn`; see [`DynPipeline`] for the boxed form used for dynamic
/// dispatch over a heterogeneous module registry.
///
/// # Example
/// ```ignore
/// struct MyModule { /* ... */ }
///
/// impl Pipeline for MyModule {
///     async fn start(&mut self) -> Result<(), VigilError> {
///         Ok(())
///     }
///     async fn stop(&mut self) -> Result<(), VigilError> {
///         Ok(())
///     }
///     async fn health_check(&self) -> HealthStatus {
///         HealthStatus::Healthy
///     }
/// }
/// ```
pub trait Pipeline: Send + Sync {
    /// Starts the module: allocates resources, spawns workers, wires channels.
    ///
    /// Returns `PipelineError::AlreadyRunning` if already started.
    fn start(&mut self) -> impl Future<Output = Result<(), VigilError>> + Send;

    /// Stops the module, performing a graceful shutdown.
    fn stop(&mut self) -> impl Future<Output = Result<(), VigilError>> + Send;

    /// Reports the module's current health.
    fn health_check(&self) -> impl Future<Output = HealthStatus> + Send;
}

/// dyn-compatible counterpart of [`Pipeline`].
///
/// `Pipeline` uses RPITIT and so cannot be made into a trait object directly;
/// `DynPipeline` boxes the futures instead, which lets the daemon hold
/// `Vec<Box<dyn DynPipeline>>` regardless of each module's concrete type.
/// Any `Pipeline` implementor gets this for free via the blanket impl below.
pub trait DynPipeline: Send + Sync {
    /// Starts the module.
    fn start(&mut self) -> BoxFuture<'_, Result<(), VigilError>>;

    /// Stops the module.
    fn stop(&mut self) -> BoxFuture<'_, Result<(), VigilError>>;

    /// Reports the module's current health.
    fn health_check(&self) -> BoxFuture<'_, HealthStatus>;
}

impl<T: Pipeline> DynPipeline for T {
    fn start(&mut self) -> BoxFuture<'_, Result<(), VigilError>> {
        Box::pin(Pipeline::start(self))
    }

    fn stop(&mut self) -> BoxFuture<'_, Result<(), VigilError>> {
        Box::pin(Pipeline::stop(self))
    }

    fn health_check(&self) -> BoxFuture<'_, HealthStatus> {
        Box::pin(Pipeline::health_check(self))
    }
}

/// A module's current operating status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Operating normally.
    Healthy,
    /// Degraded but still serving (reason attached).
    Degraded(String),
    /// Not serving (reason attached).
    Unhealthy(String),
}

impl HealthStatus {
    /// Whether the status is `Healthy`.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Whether the status is `Unhealthy`.
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded(reason) => write!(f, "degraded: {reason}"),
            Self::Unhealthy(reason) => write!(f, "unhealthy: {reason}"),
        }
    }
}
