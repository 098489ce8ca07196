//! CIDR whitelist matcher (C1).
//!
//! A pure, stateless membership check. CIDR string parsing happens once at
//! construction; everything afterward is an integer mask comparison.

use std::net::Ipv4Addr;

use vigil_core::error::{DetectorError, VigilError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Network {
    addr: u32,
    mask: u32,
}

impl Network {
    fn parse(entry: &str) -> Option<Self> {
        let (addr, prefix) = entry.split_once('/')?;
        let addr: Ipv4Addr = addr.trim().parse().ok()?;
        let prefix: u8 = prefix.trim().parse().ok()?;
        if prefix > 32 {
            return None;
        }
        let mask = if prefix == 0 {
            0
        } else {
            u32::MAX << (32 - prefix)
        };
        Some(Self {
            addr: u32::from(addr) & mask,
            mask,
        })
    }

    fn contains(&self, ip: Ipv4Addr) -> bool {
        (u32::from(ip) & self.mask) == self.addr
    }
}

/// Membership checker over a list of CIDR networks parsed at configuration time.
///
/// A malformed CIDR entry fails immediately in [`Whitelist::parse`] — the
/// runtime path never re-parses a string.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    networks: Vec<Network>,
}

impl Whitelist {
    /// Parses every configured entry as a CIDR network.
    pub fn parse(entries: &[String]) -> Result<Self, VigilError> {
        let mut networks = Vec::with_capacity(entries.len());
        for entry in entries {
            let network = Network::parse(entry)
                .ok_or_else(|| DetectorError::InvalidWhitelistEntry(entry.clone()))?;
            networks.push(network);
        }
        Ok(Self { networks })
    }

    /// Checks whether `ip` belongs to any configured network.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        self.networks.iter().any(|network| network.contains(ip))
    }

    /// Number of configured networks.
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    /// Whether no networks are configured.
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
