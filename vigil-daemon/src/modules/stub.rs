//! Stub collaborator modules.
//!
//! A production-grade chat-bot client, a full container-runtime poller,
//! and a full HTTP server framework are out of scope for this crate.
//! Each collaborator still gets a `ModuleHandle` so the
//! orchestrator's lifecycle and health-reporting story stays uniform
//! regardless of which collaborators are enabled in configuration --
//! only their internals are a no-op.

use vigil_core::error::VigilError;
use vigil_core::pipeline::{HealthStatus, Pipeline};

use super::ModuleHandle;

/// A collaborator whose real implementation is out of scope: reports
/// healthy once started, unhealthy otherwise, and does nothing else.
pub struct StubModule {
    name: &'static str,
    running: bool,
}

impl StubModule {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            running: false,
        }
    }
}

impl Pipeline for StubModule {
    async fn start(&mut self) -> Result<(), VigilError> {
        tracing::info!(module = self.name, "starting stub collaborator");
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), VigilError> {
        tracing::info!(module = self.name, "stopping stub collaborator");
        self.running = false;
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        if self.running {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy("not running".to_owned())
        }
    }
}

/// Initialize the container-stats collaborator stub.
///
/// Returns `None` if disabled in configuration.
pub fn init_container_stats(enabled: bool) -> Option<ModuleHandle> {
    if !enabled {
        tracing::info!("container-stats collaborator disabled in configuration");
        return None;
    }
    Some(ModuleHandle::new(
        "container-stats",
        true,
        Box::new(StubModule::new("container-stats")),
    ))
}

/// Initialize the HTTP API collaborator stub.
///
/// Returns `None` if disabled in configuration.
pub fn init_http_api(enabled: bool) -> Option<ModuleHandle> {
    if !enabled {
        tracing::info!("http-api collaborator disabled in configuration");
        return None;
    }
    Some(ModuleHandle::new(
        "http-api",
        true,
        Box::new(StubModule::new("http-api")),
    ))
}

/// Initialize the chat-bot collaborator stub.
///
/// Returns `None` if disabled in configuration.
pub fn init_chat_bot(enabled: bool) -> Option<ModuleHandle> {
    if !enabled {
        tracing::info!("chat-bot collaborator disabled in configuration");
        return None;
    }
    Some(ModuleHandle::new(
        "chat-bot",
        true,
        Box::new(StubModule::new("chat-bot")),
    ))
}
