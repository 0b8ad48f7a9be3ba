/*!
# Error System for Tree Grafter

Error taxonomy shared by the derivation tree, the grammar index and the
insertion engine. Only `InvalidPath` and grammar loading problems ever reach
a caller; structural mismatches and missing productions are consumed by the
engine, which simply abandons the candidate that produced them.
*/

use std::fmt;
use thiserror::Error;

use crate::tree::{NodeId, Path};

/// Result alias used throughout the library.
pub type GraftResult<T> = Result<T, GraftError>;

/// Error kind, used for logging and for deciding whether a failure is local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Recovered inside the engine, never surfaced.
    Recoverable,
    /// Caller error, reported back.
    Caller,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Recoverable => write!(f, "recoverable"),
            ErrorKind::Caller => write!(f, "caller"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraftError {
    /// The concrete tree does not realize an abstract grammar path.
    #[error("Structural mismatch at {symbol}: no child with symbol {expected}")]
    StructuralMismatch { symbol: String, expected: String },

    /// No alternative of `parent` contains the needed co-symbol `child`.
    #[error("No production of {parent} contains {child}")]
    NoProduction { parent: String, child: String },

    /// Path outside the bounds of a tree.
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: Path, reason: String },

    /// Node id lookup failed.
    #[error("Node {0} not found in tree")]
    UnknownNode(NodeId),

    /// Malformed grammar input.
    #[error("Grammar error: {0}")]
    Grammar(String),
}

impl GraftError {
    pub fn invalid_path(path: &Path, reason: impl Into<String>) -> Self {
        GraftError::InvalidPath { path: path.clone(), reason: reason.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GraftError::StructuralMismatch { .. } | GraftError::NoProduction { .. } => ErrorKind::Recoverable,
            GraftError::InvalidPath { .. } | GraftError::UnknownNode(_) | GraftError::Grammar(_) => ErrorKind::Caller,
        }
    }

    /// True for errors the engine swallows by skipping the current candidate.
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Recoverable
    }
}
