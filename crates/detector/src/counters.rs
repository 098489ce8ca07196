//! Per-IP protocol counters (C2) — SYN/HTTP/UDP maps that reset together on a cadence.

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;

use vigil_core::types::IncidentKind;

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    count: u64,
}

/// Three independent per-IP counters (SYN, HTTP, UDP) sharing one reset cadence.
///
/// The maps are cleared wholesale whenever the reset interval elapses — there
/// is no API to evict an individual cell; an IP that starts being tracked
/// stays in the map until the next reset.
#[derive(Debug)]
pub struct ProtocolCounters {
    cells: [HashMap<Ipv4Addr, Cell>; 3],
    last_reset_epoch_s: f64,
    cleanup_interval_s: f64,
}

impl ProtocolCounters {
    /// Creates an empty counter set with `now` as the baseline reset time.
    pub fn new(now: f64, cleanup_interval_s: f64) -> Self {
        Self {
            cells: Default::default(),
            last_reset_epoch_s: now,
            cleanup_interval_s,
        }
    }

    fn idx(kind: IncidentKind) -> usize {
        match kind {
            IncidentKind::Syn => 0,
            IncidentKind::Http => 1,
            IncidentKind::Udp => 2,
        }
    }

    /// Increments the `(kind, ip)` counter by 1 and returns the new value.
    pub fn increment(&mut self, kind: IncidentKind, ip: Ipv4Addr) -> u64 {
        let cell = self.cells[Self::idx(kind)].entry(ip).or_default();
        cell.count += 1;
        cell.count
    }

    /// Reads the current `(kind, ip)` counter value (0 if absent).
    pub fn get(&self, kind: IncidentKind, ip: Ipv4Addr) -> u64 {
        self.cells[Self::idx(kind)].get(&ip).map_or(0, |c| c.count)
    }

    /// Zeroes the matching `(kind, ip)` cell when an incident closes — so a
    /// fresh attack of the same kind is observed as a new open, not a continuation.
    pub fn zero(&mut self, kind: IncidentKind, ip: Ipv4Addr) {
        self.cells[Self::idx(kind)].remove(&ip);
    }

    /// Count of distinct source IPs tracked across all three maps.
    pub fn tracked_sources(&self) -> usize {
        let mut ips: HashSet<&Ipv4Addr> = HashSet::new();
        for map in &self.cells {
            ips.extend(map.keys());
        }
        ips.len()
    }

    /// Clears all three maps and advances the baseline once the reset
    /// interval has elapsed.
    ///
    /// If the clock moved backwards (`now < last_reset_epoch_s`), elapsed
    /// time is treated as 0 — a reset never fires and the baseline doesn't move.
    pub fn maybe_reset(&mut self, now: f64) -> bool {
        let elapsed = now - self.last_reset_epoch_s;
        if elapsed < self.cleanup_interval_s {
            return false;
        }
        for map in &mut self.cells {
            map.clear();
        }
        self.last_reset_epoch_s = now;
        true
    }
}
