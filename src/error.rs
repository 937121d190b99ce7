//! Crate-level error types.

use std::fmt;

/// Errors produced by the viso-interact crate.
#[derive(Debug)]
pub enum InteractError {
    /// An action code could not be built from its parts or parsed from a
    /// descriptor.
    InvalidActionCode(String),
    /// No canonical action carries the given name.
    UnknownAction(String),
    /// No picking mode carries the given name.
    UnknownPickingMode(String),
    /// No picking style carries the given name.
    UnknownPickingStyle(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for InteractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidActionCode(msg) => {
                write!(f, "invalid action code: {msg}")
            }
            Self::UnknownAction(name) => write!(f, "unknown action: {name}"),
            Self::UnknownPickingMode(name) => {
                write!(f, "unknown picking mode: {name}")
            }
            Self::UnknownPickingStyle(name) => {
                write!(f, "unknown picking style: {name}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for InteractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InteractError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
