//! Error type shared by the formsync crates.
//!
//! Synchronization itself never fails; these errors come from the edges:
//! strict binding policies, configuration loading, and state snapshots.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unnamed control | Control has an empty `name` under a rejecting policy | Construction fails |
//! | Bad config | TOML/JSON does not match the schema | Load fails |
//! | Unreadable config | File missing or unreadable | Load fails |
//! | Bad snapshot | JSON does not describe a field map | Restore fails |

use std::fmt;

/// Errors from formsync operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A control without a name was found while binding.
    UnnamedControl {
        /// Position of the control in the source's query result.
        position: usize,
    },
    /// A configuration document could not be parsed.
    Config(String),
    /// A configuration file could not be read.
    Io(String),
    /// A state snapshot could not be encoded or decoded.
    Snapshot(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnnamedControl { position } => {
                write!(f, "control at position {position} has no name")
            }
            Self::Config(msg) => write!(f, "invalid config: {msg}"),
            Self::Io(msg) => write!(f, "config i/o error: {msg}"),
            Self::Snapshot(msg) => write!(f, "state snapshot error: {msg}"),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
