#![doc = include_str!("../README.md")]
//!
//! # Module layout
//! - [`whitelist`]: CIDR whitelist matcher
//! - [`counters`]: per-IP protocol counters (SYN/HTTP/UDP, periodic reset)
//! - [`registry`]: incident registry — per-IP ordered lifecycle list
//! - [`frame`]: captured frame representation and the [`PacketSource`] ingestion contract
//! - [`clock`]: injectable time source
//! - [`classifier`]: packet classifier — feeds one frame into the whitelist/counters/registry
//! - [`reaper`]: the 1Hz expiry/notify/persist cycle
//! - [`collaborators`]: external collaborator contracts and adapters for persistence/notification/query
//! - [`state`]: lock-protected state shared by the classifier and the reaper
//! - [`detector`]: wires the above into [`IntrusionDetector`], which implements Pipeline

pub mod classifier;
pub mod clock;
pub mod collaborators;
pub mod counters;
pub mod detector;
pub mod frame;
pub mod reaper;
pub mod registry;
pub mod state;
pub mod whitelist;

pub use classifier::Thresholds;
pub use clock::{Clock, MockClock, SystemClock};
pub use collaborators::{
    FileIncidentLog, IncidentQuery, LoggingNotifier, NotificationSink, PersistenceSink,
};
pub use counters::ProtocolCounters;
pub use detector::{IntrusionDetector, IntrusionDetectorBuilder};
pub use frame::{ChannelPacketSource, HTTP_PROBE_LEN, L4, PacketSource, RawFrame, ReplayPacketSource};
pub use registry::{IncidentRegistry, ReaperBatch};
pub use state::{DetectorState, SharedState};
pub use whitelist::Whitelist;
