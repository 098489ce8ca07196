//! Metric name constants and description registration.
//!
//! Every Prometheus metric's name and description is defined centrally
//! here. Each module uses these constants when calling
//! `metrics::counter!()`, `metrics::gauge!()`, `metrics::histogram!()`.
//!
//! # Naming convention
//!
//! - Prefix: `vigil_`
//! - Module name: `detector_`, `daemon_`
//! - Suffix: `_total` (counter), `_seconds` (histogram/latency), none (gauge)
//!
//! # Example
//!
//! ```ignore
//! use vigil_core::metrics;
//! use metrics::counter;
//!
//! counter!(vigil_core::metrics::DETECTOR_PACKETS_TOTAL).increment(1);
//! ```

// ─── Label key constants ────────────────────────────────────────────

/// Protocol label key (tcp, udp, other).
pub const LABEL_PROTOCOL: &str = "protocol";

/// Incident kind label key (syn, http, udp).
pub const LABEL_INCIDENT_KIND: &str = "kind";

/// Module label key.
pub const LABEL_MODULE: &str = "module";

/// Result label key (success, failure).
pub const LABEL_RESULT: &str = "result";

// ─── Detector metrics ────────────────────────────────────────────────

/// Detector: total packets observed (counter).
pub const DETECTOR_PACKETS_TOTAL: &str = "vigil_detector_packets_total";

/// Detector: packets skipped due to whitelist match (counter).
pub const DETECTOR_PACKETS_WHITELISTED_TOTAL: &str = "vigil_detector_packets_whitelisted_total";

/// Detector: packets that failed to parse (counter).
pub const DETECTOR_PACKETS_MALFORMED_TOTAL: &str = "vigil_detector_packets_malformed_total";

/// Detector: classification latency (histogram, seconds).
pub const DETECTOR_CLASSIFY_DURATION_SECONDS: &str = "vigil_detector_classify_duration_seconds";

/// Detector: currently tracked source IP count (gauge).
pub const DETECTOR_TRACKED_SOURCES: &str = "vigil_detector_tracked_sources";

/// Detector: open incident count (gauge, label: kind).
pub const DETECTOR_INCIDENTS_OPEN: &str = "vigil_detector_incidents_open";

/// Detector: cumulative closed incident count (counter, label: kind).
pub const DETECTOR_INCIDENTS_CLOSED_TOTAL: &str = "vigil_detector_incidents_closed_total";

/// Detector: notifications sent (counter, label: result).
pub const DETECTOR_NOTIFICATIONS_SENT_TOTAL: &str = "vigil_detector_notifications_sent_total";

/// Detector: persistence failures (counter).
pub const DETECTOR_PERSISTENCE_FAILURES_TOTAL: &str = "vigil_detector_persistence_failures_total";

/// Detector: reaper cycle duration (histogram, seconds).
pub const DETECTOR_REAPER_CYCLE_DURATION_SECONDS: &str =
    "vigil_detector_reaper_cycle_duration_seconds";

// ─── Daemon metrics ──────────────────────────────────────────────────

/// Daemon: uptime (gauge, seconds).
pub const DAEMON_UPTIME_SECONDS: &str = "vigil_daemon_uptime_seconds";

/// Daemon: registered module count (gauge).
pub const DAEMON_MODULES_REGISTERED: &str = "vigil_daemon_modules_registered";

/// Daemon: build info (gauge, always 1, labels: version, commit, rust_version).
pub const DAEMON_BUILD_INFO: &str = "vigil_daemon_build_info";

// ─── Histogram bucket definitions ────────────────────────────────────

/// Packet classification latency histogram buckets (seconds).
///
/// Range is 1us–10ms — the classifier never waits, so buckets are dense at
/// microsecond granularity.
pub const CLASSIFY_DURATION_BUCKETS: [f64; 8] = [
    0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.01,
];

/// Reaper cycle duration histogram buckets (seconds).
pub const REAPER_CYCLE_DURATION_BUCKETS: [f64; 7] = [0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0];

// ─── Description registration ─────────────────────────────────────────

/// Registers descriptions for every metric.
///
/// Calls `metrics::describe_counter!()`, `describe_gauge!()`,
/// `describe_histogram!()` to set the Prometheus HELP text.
///
/// Must be called exactly once, after the global recorder is installed.
/// Typically called at `vigil-daemon` startup.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!(
        DETECTOR_PACKETS_TOTAL,
        "Total number of packets observed by the intrusion detector"
    );
    describe_counter!(
        DETECTOR_PACKETS_WHITELISTED_TOTAL,
        "Total number of packets skipped because the source matched the whitelist"
    );
    describe_counter!(
        DETECTOR_PACKETS_MALFORMED_TOTAL,
        "Total number of packets that failed to parse"
    );
    describe_histogram!(
        DETECTOR_CLASSIFY_DURATION_SECONDS,
        "Per-packet classification latency in seconds"
    );
    describe_gauge!(
        DETECTOR_TRACKED_SOURCES,
        "Number of source IPs currently tracked by the per-IP counters"
    );
    describe_gauge!(
        DETECTOR_INCIDENTS_OPEN,
        "Number of currently active incidents, by kind"
    );
    describe_counter!(
        DETECTOR_INCIDENTS_CLOSED_TOTAL,
        "Total number of incidents closed by the reaper, by kind"
    );
    describe_counter!(
        DETECTOR_NOTIFICATIONS_SENT_TOTAL,
        "Total number of notification deliveries attempted, by result"
    );
    describe_counter!(
        DETECTOR_PERSISTENCE_FAILURES_TOTAL,
        "Total number of failed attempts to persist a closed incident"
    );
    describe_histogram!(
        DETECTOR_REAPER_CYCLE_DURATION_SECONDS,
        "Time to complete one reaper sweep in seconds"
    );

    describe_gauge!(DAEMON_UPTIME_SECONDS, "Daemon uptime in seconds");
    describe_gauge!(
        DAEMON_MODULES_REGISTERED,
        "Number of modules registered in the daemon"
    );
    describe_gauge!(
        DAEMON_BUILD_INFO,
        "Build information (always 1, with version/commit labels)"
    );
}
