//! Captured frame representation and the [`PacketSource`] ingestion contract.
//!
//! A backend that actually reads packets off a real interface (libpcap /
//! AF_PACKET) is out of scope for this crate — the classifier only knows
//! about [`PacketSource`]; what's provided here are test doubles
//! ([`ReplayPacketSource`], [`ChannelPacketSource`]). A frame is parsed once,
//! down to exactly what the classifier needs, then handed over tagged.

use std::net::Ipv4Addr;
use std::sync::mpsc;

use vigil_core::error::VigilError;

/// Max length of the payload prefix kept for the HTTP heuristic.
pub const HTTP_PROBE_LEN: usize = 8;

/// The transport-layer slice the classifier actually inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum L4 {
    /// A TCP segment: flags plus a short payload prefix for the HTTP heuristic.
    Tcp { flags: u8, payload_prefix: Vec<u8> },
    /// A UDP datagram.
    Udp,
    /// Anything else (ICMP, parse failure, etc.) — never a classification target.
    Other,
}

/// The TCP SYN flag bit.
pub const TCP_FLAG_SYN: u8 = 0x02;

/// One captured frame, narrowed to what the classifier looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Source IPv4 address.
    pub src_ip: Ipv4Addr,
    /// The narrowed transport-layer payload.
    pub l4: L4,
}

impl RawFrame {
    /// Builds a pure TCP SYN frame (only the SYN bit, no other flags).
    pub fn tcp_syn(src_ip: Ipv4Addr) -> Self {
        Self {
            src_ip,
            l4: L4::Tcp {
                flags: TCP_FLAG_SYN,
                payload_prefix: Vec::new(),
            },
        }
    }

    /// Builds a TCP frame carrying the given payload prefix (no SYN flag).
    pub fn tcp_with_payload(src_ip: Ipv4Addr, payload: &[u8]) -> Self {
        let mut prefix = payload.to_vec();
        prefix.truncate(HTTP_PROBE_LEN);
        Self {
            src_ip,
            l4: L4::Tcp {
                flags: 0,
                payload_prefix: prefix,
            },
        }
    }

    /// Builds a UDP frame.
    pub fn udp(src_ip: Ipv4Addr) -> Self {
        Self {
            src_ip,
            l4: L4::Udp,
        }
    }

    /// Builds a frame that is never a classification target.
    pub fn other(src_ip: Ipv4Addr) -> Self {
        Self {
            src_ip,
            l4: L4::Other,
        }
    }
}

/// A blocking ingestion source emitting captured frames.
///
/// The real implementation is assumed to live outside this crate (a
/// dedicated capture thread calling [`recv_blocking`](Self::recv_blocking) in
/// a loop). Everything provided here is for tests.
pub trait PacketSource: Send {
    /// Blocks until the next frame arrives. Returns `Ok(None)` once the
    /// source has no more frames, ending the capture loop.
    fn recv_blocking(&mut self) -> Result<Option<RawFrame>, VigilError>;
}

/// Emits a fixed sequence of frames in order, then reports the source as closed.
pub struct ReplayPacketSource {
    frames: std::vec::IntoIter<RawFrame>,
}

impl ReplayPacketSource {
    /// Builds a source from the list of frames to replay.
    pub fn new(frames: Vec<RawFrame>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl PacketSource for ReplayPacketSource {
    fn recv_blocking(&mut self) -> Result<Option<RawFrame>, VigilError> {
        Ok(self.frames.next())
    }
}

/// Test double driven by an explicit channel.
///
/// Used for scenario tests that need to interleave reaper ticks with packet
/// injection — whoever holds the sender can push frames at whatever timing
/// the test needs.
pub struct ChannelPacketSource {
    rx: mpsc::Receiver<RawFrame>,
}

impl ChannelPacketSource {
    /// Builds a source from the given receiver.
    pub fn new(rx: mpsc::Receiver<RawFrame>) -> Self {
        Self { rx }
    }
}

impl PacketSource for ChannelPacketSource {
    fn recv_blocking(&mut self) -> Result<Option<RawFrame>, VigilError> {
        match self.rx.recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(_) => Ok(None),
        }
    }
}
