//! Error types and the crate-wide result alias.
//!
//! Every failure is raised at the point of violation; construction and glom
//! are all-or-nothing, so an `Err` never comes with a partial collection.

use std::fmt;

/// The result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Positional axis of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Profile,
    Horizon,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Profile => write!(f, "profile"),
            Axis::Horizon => write!(f, "horizon"),
        }
    }
}

/// Broad error classes callers usually match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Schema,
    Consistency,
    Index,
    Config,
}

/// Errors raised by collection construction, indexing and glom.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required column is missing or holds values of the wrong type.
    #[error("schema error: {0}")]
    Schema(String),

    /// A structural invariant does not hold (duplicate identities,
    /// overlapping sibling horizons, post-glom overlap).
    #[error("consistency error: {0}")]
    Consistency(String),

    /// A positional selector fell outside its axis.
    #[error("index error: {axis} position {position} is out of range (length {len})")]
    Index {
        axis: Axis,
        position: usize,
        len: usize,
    },

    /// A profile identity that is not part of the collection.
    #[error("index error: unknown profile id {0}")]
    UnknownProfile(String),

    /// Invalid options: bad breakpoints, unknown policy or mode names.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Schema(_) => ErrorKind::Schema,
            Error::Consistency(_) => ErrorKind::Consistency,
            Error::Index { .. } | Error::UnknownProfile(_) => ErrorKind::Index,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Error::Schema(message.into())
    }

    pub(crate) fn consistency(message: impl Into<String>) -> Self {
        Error::Consistency(message.into())
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}
