//! State shared by the classifier and the reaper, behind a single lock.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::counters::ProtocolCounters;
use crate::registry::IncidentRegistry;

/// The triple of state touched by both the classifier (capture thread) and
/// the reaper (async task).
///
/// Protected by one coarse lock — classification itself never blocks or
/// awaits, so lock hold time is always short.
pub struct DetectorState {
    /// Per-IP protocol counters.
    pub counters: ProtocolCounters,
    /// Per-IP incident lifecycle list.
    pub registry: IncidentRegistry,
}

/// Shared handle cloned into both the capture thread and the reaper task.
pub type SharedState = Arc<Mutex<DetectorState>>;
