//! Incident registry (C3) — a per-IP ordered lifecycle list.

use std::collections::HashMap;
use std::net::Ipv4Addr;

use vigil_core::types::{Incident, IncidentKind};

/// Result of one reaper cycle: incidents closed, plus newly-active incidents
/// that hadn't been announced yet.
#[derive(Debug, Default, Clone)]
pub struct ReaperBatch {
    /// Incidents closed this cycle due to idle timeout.
    pub closed: Vec<Incident>,
    /// Still-active incidents newly marked for notification this cycle.
    pub opened: Vec<Incident>,
}

impl ReaperBatch {
    /// The full list to ship in a single notification call — order doesn't matter.
    pub fn to_notify(&self) -> Vec<Incident> {
        let mut all = Vec::with_capacity(self.opened.len() + self.closed.len());
        all.extend(self.opened.iter().cloned());
        all.extend(self.closed.iter().cloned());
        all
    }

    /// Whether the batch is entirely empty.
    pub fn is_empty(&self) -> bool {
        self.closed.is_empty() && self.opened.is_empty()
    }
}

/// Per-IP incident list kept in order of occurrence.
///
/// At most one incident for a given `(ip, kind)` is ever active at once —
/// the classifier always checks [`find_active`](Self::find_active) first and
/// only calls [`open`](Self::open) when it returns none.
#[derive(Debug, Default)]
pub struct IncidentRegistry {
    by_ip: HashMap<Ipv4Addr, Vec<Incident>>,
}

impl IncidentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the unique active incident for `(ip, kind)`.
    pub fn find_active(&mut self, ip: Ipv4Addr, kind: IncidentKind) -> Option<&mut Incident> {
        let label = kind.to_string();
        self.by_ip
            .get_mut(&ip)?
            .iter_mut()
            .find(|incident| incident.is_active() && incident.kind_label == label)
    }

    /// Appends a newly-active, not-yet-notified incident.
    ///
    /// The caller must already have confirmed via
    /// [`find_active`](Self::find_active) that no active incident exists
    /// for this `(ip, kind)`.
    pub fn open(&mut self, ip: Ipv4Addr, kind: IncidentKind, count: u64, now: f64) -> &Incident {
        let incident = Incident::open(ip, kind, count, now);
        let list = self.by_ip.entry(ip).or_default();
        list.push(incident);
        list.last().expect("just pushed an element")
    }

    /// Closes and removes every active incident whose idle time exceeds
    /// `expiry_secs`. Also collects still-active incidents that are newly
    /// marked for notification this cycle.
    ///
    /// Expiry and first-notification are mutually exclusive: an expired
    /// active incident goes only to the closed batch, never also to the
    /// opened batch in the same cycle.
    pub fn close_expired(&mut self, now: f64, expiry_secs: f64) -> ReaperBatch {
        let mut batch = ReaperBatch::default();

        let ips: Vec<Ipv4Addr> = self.by_ip.keys().copied().collect();
        for ip in ips {
            let Some(list) = self.by_ip.get_mut(&ip) else {
                continue;
            };

            let mut i = 0;
            while i < list.len() {
                let incident = &list[i];
                if !incident.is_active() {
                    i += 1;
                    continue;
                }

                let idle = now - incident.time_last_packet;
                if idle >= expiry_secs {
                    let mut closed = list.remove(i);
                    closed.status = false;
                    closed.notification = true;
                    batch.closed.push(closed);
                    continue;
                }

                if !incident.notification {
                    list[i].notification = true;
                    batch.opened.push(list[i].clone());
                }
                i += 1;
            }

            if self.by_ip.get(&ip).is_some_and(Vec::is_empty) {
                self.by_ip.remove(&ip);
            }
        }

        batch
    }

    /// Marks every active, not-yet-notified incident as notified and
    /// returns them. Used on shutdown for the "notify without closing" path
    /// — does not remove anything from the registry.
    pub fn drain_unnotified_active(&mut self) -> Vec<Incident> {
        let mut drained = Vec::new();
        for list in self.by_ip.values_mut() {
            for incident in list.iter_mut() {
                if incident.is_active() && !incident.notification {
                    incident.notification = true;
                    drained.push(incident.clone());
                }
            }
        }
        drained
    }

    /// Count of currently active incidents (summed over all IPs and kinds).
    pub fn active_count(&self) -> usize {
        self.by_ip
            .values()
            .flatten()
            .filter(|incident| incident.is_active())
            .count()
    }

    /// A copy of every incident currently held — for tests and queries.
    pub fn snapshot(&self) -> Vec<Incident> {
        self.by_ip.values().flatten().cloned().collect()
    }
}
