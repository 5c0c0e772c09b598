//! Error types for the credential trial engine

use std::path::PathBuf;

use thiserror::Error;

use super::types::TrialState;

/// Result type for link controller operations
pub type LinkResult<T> = Result<T, LinkError>;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for trial engine operations
pub type TrialResult<T> = Result<T, TrialError>;

/// Result type for result reporting
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors raised by a link controller outside of a single attempt
#[derive(Error, Debug, Clone)]
pub enum LinkError {
    #[error("WiFi scan failed: {0}")]
    ScanFailed(String),

    #[error("wpa_supplicant error: {0}")]
    WpaSupplicantError(String),
}

/// Errors that prevent a run from starting
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Candidate set is empty")]
    EmptyCandidateSet,

    #[error("Wordlist not found: {}", .0.display())]
    WordlistNotFound(PathBuf),

    #[error("Failed to read wordlist {}: {source}", .path.display())]
    WordlistIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Wordlist contains no candidates: {}", .0.display())]
    WordlistEmpty(PathBuf),

    #[error("Network {network} uses unsupported security ({methods})")]
    UnsupportedSecurity { network: String, methods: String },

    #[error("Network {0} is hidden, its name must be given explicitly")]
    HiddenNetwork(String),

    #[error("Target network not found: {0}")]
    TargetNotFound(String),
}

/// Engine level failures
#[derive(Error, Debug)]
pub enum TrialError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Adapter fault after {attempts} attempts: {reason}")]
    AdapterFault { attempts: usize, reason: String },

    #[error("Invalid state transition from {from:?} to {to:?}")]
    InvalidStateTransition { from: TrialState, to: TrialState },
}

/// Errors raised while rendering or persisting results
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session has no matched candidate")]
    NoMatch,
}
