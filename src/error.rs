//! Crate-level error types.

use std::fmt;

/// Errors produced by the mesoscale crate.
#[derive(Debug)]
pub enum MesoError {
    /// Unknown graphics tier name. Never substituted with a default tier.
    InvalidTier(String),
    /// A node referenced by an in-flight cascade no longer exists in the
    /// hierarchy. The batch was not committed.
    StaleHierarchyReference(String),
    /// A color scheme field is outside its allowed range.
    MalformedColorSpec {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A queued update does not apply to the kind of node it targets.
    InvalidUpdate(String),
    /// Structural misuse of a hierarchy store (duplicate tag, unknown
    /// parent group).
    Hierarchy(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for MesoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTier(name) => {
                write!(f, "invalid graphics tier: {name:?}")
            }
            Self::StaleHierarchyReference(node) => {
                write!(f, "stale hierarchy reference: {node}")
            }
            Self::MalformedColorSpec { field, value } => {
                write!(f, "malformed color spec: {field} = {value}")
            }
            Self::InvalidUpdate(msg) => write!(f, "invalid update: {msg}"),
            Self::Hierarchy(msg) => write!(f, "hierarchy error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for MesoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MesoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl MesoError {
    /// Whether the host can retry after re-reading the hierarchy.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::StaleHierarchyReference(_))
    }
}
