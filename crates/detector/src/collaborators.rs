//! External collaborator contracts (§6) — persistence, notification, query.
//!
//! Real production adapters (an actual chat-bot transport, an actual HTTP
//! snapshot API) are out of scope for this crate. What's here is the
//! narrowest pair of adapters the detector can actually call against
//! ([`FileIncidentLog`], [`LoggingNotifier`]).

use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::Mutex;

use vigil_core::error::{DetectorError, VigilError};
use vigil_core::pipeline::BoxFuture;
use vigil_core::types::Incident;

/// Contract for persisting a single closed incident.
pub trait PersistenceSink: Send + Sync {
    /// Writes `incident` to the store. The caller (the reaper) logs and
    /// swallows failure — there is no retry.
    fn persist<'a>(&'a self, incident: &'a Incident) -> BoxFuture<'a, Result<(), VigilError>>;
}

/// Contract for announcing a batch of incidents.
pub trait NotificationSink: Send + Sync {
    /// Delivers `batch`. A batch bundles every incident newly opened or
    /// closed in this cycle into one call.
    fn notify<'a>(&'a self, batch: &'a [Incident]) -> BoxFuture<'a, Result<(), VigilError>>;
}

/// Contract for querying the current record (status reporting, CLI).
pub trait IncidentQuery: Send + Sync {
    /// Returns a snapshot of every persisted incident.
    fn snapshot(&self) -> BoxFuture<'_, Result<Vec<Incident>, VigilError>>;
}

/// Adapter that appends closed incidents to a single JSON array file.
///
/// Every call reads the whole file, appends the entry, and rewrites it
/// with 4-space indent (read-modify-write) — it mimics an append-only
/// format but actually re-serializes the entire file each time.
pub struct FileIncidentLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileIncidentLog {
    /// Creates an adapter reading from and writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<Incident>, VigilError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| DetectorError::Persistence(e.to_string()).into()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(DetectorError::Persistence(e.to_string()).into()),
        }
    }

    fn write_pretty(all: &[Incident]) -> Result<String, VigilError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        all.serialize(&mut serializer)
            .map_err(|e| DetectorError::Persistence(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| DetectorError::Persistence(e.to_string()).into())
    }
}

impl PersistenceSink for FileIncidentLog {
    fn persist<'a>(&'a self, incident: &'a Incident) -> BoxFuture<'a, Result<(), VigilError>> {
        Box::pin(async move {
            let _guard = self.write_lock.lock().await;
            let mut all = self.read_all().await?;
            all.push(incident.clone());
            let json = Self::write_pretty(&all)?;

            if let Some(parent) = self.path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| DetectorError::Persistence(e.to_string()))?;
            }
            tokio::fs::write(&self.path, json)
                .await
                .map_err(|e| DetectorError::Persistence(e.to_string()))?;
            Ok(())
        })
    }
}

impl IncidentQuery for FileIncidentLog {
    fn snapshot(&self) -> BoxFuture<'_, Result<Vec<Incident>, VigilError>> {
        Box::pin(async move { self.read_all().await })
    }
}

/// Minimal notifier that emits a notification batch as structured log lines.
///
/// Real chat-bot delivery is out of scope — this adapter exists so the
/// detector always has something to call on its notification path.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl NotificationSink for LoggingNotifier {
    fn notify<'a>(&'a self, batch: &'a [Incident]) -> BoxFuture<'a, Result<(), VigilError>> {
        Box::pin(async move {
            for incident in batch {
                tracing::warn!(
                    source_ip = %incident.source_ip,
                    kind = %incident.kind_label,
                    count = incident.count,
                    active = incident.is_active(),
                    "attack detected"
                );
            }
            Ok(())
        })
    }
}
