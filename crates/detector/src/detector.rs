//! Intrusion detector module (C4) — owns the capture thread and the reaper
//! task, and implements the [`Pipeline`](vigil_core::pipeline::Pipeline)
//! lifecycle contract.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::Mutex as AsyncMutex;
use tokio_util::sync::CancellationToken;

use vigil_core::config::DetectorConfig;
use vigil_core::error::{DetectorError, PipelineError, VigilError};
use vigil_core::metrics::DETECTOR_PACKETS_MALFORMED_TOTAL;
use vigil_core::pipeline::{HealthStatus, Pipeline};

use crate::classifier::{self, Thresholds};
use crate::clock::{Clock, SystemClock};
use crate::collaborators::{
    FileIncidentLog, IncidentQuery, LoggingNotifier, NotificationSink, PersistenceSink,
};
use crate::counters::ProtocolCounters;
use crate::frame::PacketSource;
use crate::reaper;
use crate::registry::IncidentRegistry;
use crate::state::{DetectorState, SharedState};
use crate::whitelist::Whitelist;

/// Fixed cadence the reaper runs at (§4.4.2).
const REAPER_TICK: Duration = Duration::from_secs(1);

/// Intrusion detector bundling the packet classifier, incident registry, and reaper.
///
/// Capture itself is consumed via blocking calls to a [`PacketSource`] on a
/// dedicated native thread, while the reaper runs at 1Hz on a separate async
/// task. The two communicate only through [`SharedState`].
pub struct IntrusionDetector {
    state: SharedState,
    whitelist: Whitelist,
    thresholds: Thresholds,
    expiry_secs: f64,
    clock: Arc<dyn Clock>,
    packet_source: Option<Box<dyn PacketSource>>,
    persistence: Arc<dyn PersistenceSink>,
    notifier: Arc<dyn NotificationSink>,
    query: Arc<dyn IncidentQuery>,
    cancel: CancellationToken,
    capture_task: Option<std::thread::JoinHandle<()>>,
    reaper_task: Option<tokio::task::JoinHandle<()>>,
}

impl IntrusionDetector {
    /// Starts a builder for assembling a new detector.
    pub fn builder() -> IntrusionDetectorBuilder {
        IntrusionDetectorBuilder::default()
    }

    /// A handle for querying persisted incidents (used by CLI `status`/`config`).
    pub fn query(&self) -> Arc<dyn IncidentQuery> {
        self.query.clone()
    }
}

impl Pipeline for IntrusionDetector {
    async fn start(&mut self) -> Result<(), VigilError> {
        if self.capture_task.is_some() {
            return Err(PipelineError::AlreadyRunning.into());
        }
        let Some(mut source) = self.packet_source.take() else {
            return Err(DetectorError::MalformedPacket("no packet source configured".into()).into());
        };

        let state = Arc::clone(&self.state);
        let whitelist = self.whitelist.clone();
        let thresholds = self.thresholds;
        let clock = Arc::clone(&self.clock);
        let cancel = self.cancel.clone();

        let capture_task = std::thread::spawn(move || {
            loop {
                if cancel.is_cancelled() {
                    break;
                }
                match source.recv_blocking() {
                    Ok(Some(frame)) => {
                        let now = clock.now_epoch();
                        let mut guard = state.blocking_lock();
                        classifier::classify(&mut guard, &whitelist, &frame, now, &thresholds);
                        guard.counters.maybe_reset(now);
                    }
                    Ok(None) => break,
                    Err(e) => {
                        counter!(DETECTOR_PACKETS_MALFORMED_TOTAL).increment(1);
                        tracing::debug!(error = %e, "malformed packet dropped");
                    }
                }
            }
        });
        self.capture_task = Some(capture_task);

        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let persistence = Arc::clone(&self.persistence);
        let notifier = Arc::clone(&self.notifier);
        let expiry_secs = self.expiry_secs;
        let cancel = self.cancel.clone();

        let reaper_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(REAPER_TICK);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let now = clock.now_epoch();
                        reaper::run_cycle(&state, expiry_secs, now, persistence.as_ref(), notifier.as_ref()).await;
                    }
                    _ = cancel.cancelled() => {
                        reaper::flush_unclosed(&state, notifier.as_ref()).await;
                        break;
                    }
                }
            }
        });
        self.reaper_task = Some(reaper_task);

        Ok(())
    }

    async fn stop(&mut self) -> Result<(), VigilError> {
        if self.capture_task.is_none() {
            return Err(PipelineError::NotRunning.into());
        }

        self.cancel.cancel();

        if let Some(handle) = self.reaper_task.take() {
            let _ = handle.await;
        }
        if let Some(handle) = self.capture_task.take() {
            let _ = handle.join();
        }

        // Re-arm so a subsequent start() (e.g. after a config reload) works.
        self.cancel = CancellationToken::new();
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        if self.capture_task.is_some() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy("not running".to_owned())
        }
    }
}

/// Builds an [`IntrusionDetector`] from config plus optional collaborator
/// overrides — tests inject `MockClock` and recording sinks here, production
/// code accepts the defaults.
#[derive(Default)]
pub struct IntrusionDetectorBuilder {
    config: Option<DetectorConfig>,
    packet_source: Option<Box<dyn PacketSource>>,
    clock: Option<Arc<dyn Clock>>,
    persistence: Option<Arc<dyn PersistenceSink>>,
    notifier: Option<Arc<dyn NotificationSink>>,
    query: Option<Arc<dyn IncidentQuery>>,
}

impl IntrusionDetectorBuilder {
    /// Sets the detector configuration (thresholds, whitelist, expiry, ...).
    pub fn config(mut self, config: DetectorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the packet source the capture thread drains.
    pub fn packet_source(mut self, source: Box<dyn PacketSource>) -> Self {
        self.packet_source = Some(source);
        self
    }

    /// Overrides the clock (`MockClock` in tests).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Overrides the persistence sink.
    pub fn persistence(mut self, sink: Arc<dyn PersistenceSink>) -> Self {
        self.persistence = Some(sink);
        self
    }

    /// Overrides the notification sink.
    pub fn notifier(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(sink);
        self
    }

    /// Overrides the incident query handle.
    pub fn query(mut self, query: Arc<dyn IncidentQuery>) -> Self {
        self.query = Some(query);
        self
    }

    /// Assembles the detector. Fails only if the whitelist fails to parse.
    pub fn build(self) -> Result<IntrusionDetector, VigilError> {
        let config = self.config.unwrap_or_default();
        let whitelist = Whitelist::parse(&config.whitelist)?;
        let thresholds = Thresholds {
            syn: config.threshold_syn,
            http: config.threshold_http,
            udp: config.threshold_udp,
        };
        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let now = clock.now_epoch();

        let persistence: Arc<dyn PersistenceSink> = self
            .persistence
            .unwrap_or_else(|| Arc::new(FileIncidentLog::new(config.persistence_path.clone())));
        let notifier: Arc<dyn NotificationSink> =
            self.notifier.unwrap_or_else(|| Arc::new(LoggingNotifier));
        let query: Arc<dyn IncidentQuery> = self
            .query
            .unwrap_or_else(|| Arc::new(FileIncidentLog::new(config.persistence_path.clone())));

        Ok(IntrusionDetector {
            state: Arc::new(AsyncMutex::new(DetectorState {
                counters: ProtocolCounters::new(now, config.cleanup_interval_secs as f64),
                registry: IncidentRegistry::new(),
            })),
            whitelist,
            thresholds,
            expiry_secs: config.attack_expiry_secs as f64,
            clock,
            packet_source: self.packet_source,
            persistence,
            notifier,
            query,
            cancel: CancellationToken::new(),
            capture_task: None,
            reaper_task: None,
        })
    }
}
