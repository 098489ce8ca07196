//! Error types — domain-specific error hierarchy.

/// Top-level vigil error type.
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    /// Configuration-related error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Module lifecycle error.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Intrusion detector error.
    #[error("detector error: {0}")]
    Detector(#[from] DetectorError),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be found.
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// Configuration failed to parse.
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// A configuration value failed validation.
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Module lifecycle error.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// `start()` called on an already-running module.
    #[error("module already running")]
    AlreadyRunning,

    /// `stop()` called on a module that is not running.
    #[error("module not running")]
    NotRunning,

    /// Channel send failed.
    #[error("channel send failed: {0}")]
    ChannelSend(String),

    /// Channel receive failed.
    #[error("channel receive failed: {0}")]
    ChannelRecv(String),

    /// Module initialization failed.
    #[error("pipeline init failed: {0}")]
    InitFailed(String),
}

/// Intrusion detector error.
///
/// Kinds correspond to the policies in the error handling design: malformed
/// packets and clock skew are recovered from inline; persistence and
/// notification failures are logged and swallowed by the reaper.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    /// A captured frame could not be interpreted (missing layer, bad decode).
    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    /// The whitelist contains an entry that does not parse as a CIDR.
    #[error("invalid whitelist entry '{0}'")]
    InvalidWhitelistEntry(String),

    /// A closed incident could not be persisted.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// A notification batch could not be delivered.
    #[error("notification failed: {0}")]
    Notification(String),
}
