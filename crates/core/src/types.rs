//! Domain types shared across the workspace.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// Severity level, used to rank incidents and health reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Informational.
    Info,
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
    /// Critical.
    Critical,
}

/// The protocol-level classification of a flood incident.
///
/// Dispatch order in the classifier is always `Syn`, `Http`, `Udp` — the
/// first matching protocol for a frame wins, so a single frame can never
/// open more than one kind of incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentKind {
    /// A burst of bare TCP SYN segments from one source.
    Syn,
    /// A burst of TCP segments whose payload looks like an HTTP request line.
    Http,
    /// A burst of UDP datagrams from one source.
    Udp,
}

impl IncidentKind {
    /// All kinds, in classifier dispatch order.
    pub const ALL: [IncidentKind; 3] = [IncidentKind::Syn, IncidentKind::Http, IncidentKind::Udp];

    /// Recovers the kind from a persisted `type` label (the inverse of `Display`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "SYN Flood" => Some(Self::Syn),
            "HTTP Flood" => Some(Self::Http),
            "UDP Flood" => Some(Self::Udp),
            _ => None,
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Syn => "SYN Flood",
            Self::Http => "HTTP Flood",
            Self::Udp => "UDP Flood",
        };
        write!(f, "{label}")
    }
}

/// A single attack incident: one contiguous episode of flood traffic from
/// one source IP, of one [`IncidentKind`].
///
/// Field order and names match the persisted JSON record exactly:
/// `sourceIp, timeStart, timeLastPacket, notification, status, type, count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Source IPv4 address responsible for the flood.
    #[serde(rename = "sourceIp")]
    pub source_ip: Ipv4Addr,
    /// Seconds since the epoch when the incident was opened.
    #[serde(rename = "timeStart")]
    pub time_start: f64,
    /// Seconds since the epoch of the most recent reinforcing packet.
    #[serde(rename = "timeLastPacket")]
    pub time_last_packet: f64,
    /// Whether this incident has already been handed to the notifier.
    pub notification: bool,
    /// `true` while the incident is active, `false` once closed.
    pub status: bool,
    /// Attack type, rendered the same way as [`IncidentKind::Display`].
    #[serde(rename = "type")]
    pub kind_label: String,
    /// Packet count observed while the incident was active.
    pub count: u64,
}

impl Incident {
    /// Opens a new active, unnotified incident.
    pub fn open(source_ip: Ipv4Addr, kind: IncidentKind, count: u64, now: f64) -> Self {
        Self {
            source_ip,
            time_start: now,
            time_last_packet: now,
            notification: false,
            status: true,
            kind_label: kind.to_string(),
            count,
        }
    }

    /// Whether this incident is currently active.
    pub fn is_active(&self) -> bool {
        self.status
    }

    /// Reinforces an active incident with a fresh packet observation.
    pub fn reinforce(&mut self, count: u64, now: f64) {
        self.count = count;
        self.time_last_packet = now;
    }
}
