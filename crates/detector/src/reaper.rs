//! Reaper (C4.2) — the 1Hz cycle that closes, persists, and notifies expired incidents.

use std::time::Duration;

use metrics::{counter, histogram};
use tokio::time::timeout;
use tracing::{error, warn};

use vigil_core::metrics::{
    DETECTOR_INCIDENTS_CLOSED_TOTAL, DETECTOR_NOTIFICATIONS_SENT_TOTAL,
    DETECTOR_PERSISTENCE_FAILURES_TOTAL, DETECTOR_REAPER_CYCLE_DURATION_SECONDS,
    LABEL_INCIDENT_KIND, LABEL_RESULT,
};
use vigil_core::types::{Incident, IncidentKind};

use crate::collaborators::{NotificationSink, PersistenceSink};
use crate::state::SharedState;

/// Deadline imposed on a single collaborator call (§5 Timeouts).
pub const COLLABORATOR_DEADLINE: Duration = Duration::from_secs(5);

/// Runs one cycle: closes expired incidents, attempts to persist each one,
/// then announces newly-opened or newly-closed incidents as a single batch.
///
/// Both persistence and notification failures are logged and swallowed —
/// the cycle itself never fails.
pub async fn run_cycle(
    state: &SharedState,
    expiry_secs: f64,
    now: f64,
    persistence: &dyn PersistenceSink,
    notifier: &dyn NotificationSink,
) {
    let start = std::time::Instant::now();

    let batch = {
        let mut guard = state.lock().await;
        let batch = guard.registry.close_expired(now, expiry_secs);
        for incident in &batch.closed {
            if let Some(kind) = IncidentKind::from_label(&incident.kind_label) {
                guard.counters.zero(kind, incident.source_ip);
            }
        }
        batch
    };

    for incident in &batch.closed {
        match timeout(COLLABORATOR_DEADLINE, persistence.persist(incident)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                counter!(DETECTOR_PERSISTENCE_FAILURES_TOTAL).increment(1);
                error!(
                    source_ip = %incident.source_ip,
                    kind = %incident.kind_label,
                    error = %e,
                    "failed to persist closed incident"
                );
            }
            Err(_) => {
                counter!(DETECTOR_PERSISTENCE_FAILURES_TOTAL).increment(1);
                error!(
                    source_ip = %incident.source_ip,
                    kind = %incident.kind_label,
                    "persistence deadline exceeded"
                );
            }
        }
        counter!(DETECTOR_INCIDENTS_CLOSED_TOTAL, LABEL_INCIDENT_KIND => incident.kind_label.clone())
            .increment(1);
    }

    notify_batch(&batch.to_notify(), notifier).await;

    histogram!(DETECTOR_REAPER_CYCLE_DURATION_SECONDS).record(start.elapsed().as_secs_f64());
}

/// On shutdown, announces any still-active, not-yet-notified incidents one
/// last time. Never persists them — they never closed, so there is no
/// "closed record" to store.
pub async fn flush_unclosed(state: &SharedState, notifier: &dyn NotificationSink) {
    let pending: Vec<Incident> = {
        let mut guard = state.lock().await;
        guard.registry.drain_unnotified_active()
    };
    notify_batch(&pending, notifier).await;
}

async fn notify_batch(batch: &[Incident], notifier: &dyn NotificationSink) {
    if batch.is_empty() {
        return;
    }

    match timeout(COLLABORATOR_DEADLINE, notifier.notify(batch)).await {
        Ok(Ok(())) => {
            counter!(DETECTOR_NOTIFICATIONS_SENT_TOTAL, LABEL_RESULT => "success").increment(1);
        }
        Ok(Err(e)) => {
            counter!(DETECTOR_NOTIFICATIONS_SENT_TOTAL, LABEL_RESULT => "failure").increment(1);
            warn!(error = %e, batch_len = batch.len(), "notification delivery failed");
        }
        Err(_) => {
            counter!(DETECTOR_NOTIFICATIONS_SENT_TOTAL, LABEL_RESULT => "failure").increment(1);
            warn!(batch_len = batch.len(), "notification deadline exceeded");
        }
    }
}
