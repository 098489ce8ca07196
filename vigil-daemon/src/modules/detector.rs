//! Intrusion detector module initialization.
//!
//! Converts `VigilConfig.detector` into an `IntrusionDetector` and wraps
//! it in a `ModuleHandle`. A real packet-capture backend (libpcap/AF_PACKET)
//! is out of scope for this crate, so production wiring uses an empty
//! `ReplayPacketSource` as a placeholder until one is added.

use anyhow::Result;

use vigil_core::config::VigilConfig;
use vigil_detector::{IntrusionDetector, ReplayPacketSource};

use super::ModuleHandle;

/// Initialize the intrusion detector module.
///
/// Returns `None` if the detector is disabled in configuration.
///
/// # Arguments
///
/// * `config` - The full vigil configuration
///
/// # Returns
///
/// * `Ok(Some(ModuleHandle))` - Detector initialized and ready to start
/// * `Ok(None)` - Module disabled in configuration
/// * `Err(_)` - Initialization failed (e.g. malformed whitelist)
pub fn init(config: &VigilConfig) -> Result<Option<ModuleHandle>> {
    if !config.detector.enabled {
        tracing::info!("detector disabled in configuration");
        return Ok(None);
    }

    tracing::info!(interface = %config.detector.interface, "initializing intrusion detector");

    // TODO: wire a real libpcap/AF_PACKET PacketSource once one exists;
    // an empty replay source keeps the module lifecycle wiring exercised
    // without pretending capture is implemented.
    let detector = IntrusionDetector::builder()
        .config(config.detector.clone())
        .packet_source(Box::new(ReplayPacketSource::new(Vec::new())))
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build intrusion detector: {}", e))?;

    let handle = ModuleHandle::new("detector", true, Box::new(detector));

    Ok(Some(handle))
}
