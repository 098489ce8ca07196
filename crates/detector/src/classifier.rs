//! Packet classifier (C4.1) — the hot path that feeds a single frame into
//! the whitelist, counters, and registry. Never blocks, never awaits.

use std::net::Ipv4Addr;

use metrics::counter;
use vigil_core::metrics::{
    DETECTOR_PACKETS_TOTAL, DETECTOR_PACKETS_WHITELISTED_TOTAL,
};
use vigil_core::types::IncidentKind;

use crate::frame::{L4, RawFrame, TCP_FLAG_SYN};
use crate::state::DetectorState;
use crate::whitelist::Whitelist;

/// Per-reset-window thresholds for SYN/HTTP/UDP respectively.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// SYN flood threshold.
    pub syn: u64,
    /// HTTP flood threshold.
    pub http: u64,
    /// UDP flood threshold.
    pub udp: u64,
}

impl Thresholds {
    fn for_kind(&self, kind: IncidentKind) -> u64 {
        match kind {
            IncidentKind::Syn => self.syn,
            IncidentKind::Http => self.http,
            IncidentKind::Udp => self.udp,
        }
    }
}

/// Feeds one frame through the whitelist, counters, and registry in order.
///
/// Dispatch is first-match-wins, checked only in SYN → HTTP → UDP order —
/// a single frame can never open two incident kinds at once. Frames that
/// fail to parse or don't match any protocol are dropped silently.
pub fn classify(
    state: &mut DetectorState,
    whitelist: &Whitelist,
    frame: &RawFrame,
    now: f64,
    thresholds: &Thresholds,
) {
    counter!(DETECTOR_PACKETS_TOTAL).increment(1);

    if whitelist.contains(frame.src_ip) {
        counter!(DETECTOR_PACKETS_WHITELISTED_TOTAL).increment(1);
        return;
    }

    match &frame.l4 {
        L4::Tcp { flags, .. } if *flags == TCP_FLAG_SYN => {
            bump(state, frame.src_ip, IncidentKind::Syn, thresholds, now);
        }
        L4::Tcp { payload_prefix, .. } if looks_like_http(payload_prefix) => {
            bump(state, frame.src_ip, IncidentKind::Http, thresholds, now);
        }
        L4::Udp => {
            bump(state, frame.src_ip, IncidentKind::Udp, thresholds, now);
        }
        _ => {}
    }
}

fn looks_like_http(prefix: &[u8]) -> bool {
    let text = String::from_utf8_lossy(prefix);
    text.contains("GET") || text.contains("POST")
}

fn bump(state: &mut DetectorState, ip: Ipv4Addr, kind: IncidentKind, thresholds: &Thresholds, now: f64) {
    let count = state.counters.increment(kind, ip);
    if count <= thresholds.for_kind(kind) {
        return;
    }

    if let Some(incident) = state.registry.find_active(ip, kind) {
        incident.reinforce(count, now);
    } else {
        state.registry.open(ip, kind, count, now);
    }
}
