//! Driver-level error taxonomy, unifying the engine's own errors with
//! the two failure modes that only exist once there's a remote: a
//! failed HTTP exchange, and a broken internal invariant.

use std::fmt;

use galaxy_engine::{ModulationError, ParseError, ReducerError};

use crate::remote::RemoteError;

/// Everything that can go wrong loading definitions or running one
/// `interact` call.
#[derive(Debug)]
pub enum DriverError {
    /// The definitions file could not be read from disk.
    Io(std::io::Error),
    /// The definitions file was malformed.
    Parse(ParseError),
    /// Reduction failed (type error, undefined atom, budget exceeded).
    Reducer(ReducerError),
    /// The modulation round-trip check failed, or a modulation itself
    /// failed.
    Modulation(ModulationError),
    /// The remote exchange failed.
    Remote(RemoteError),
    /// An internal consistency check failed: a bug in the reducer or
    /// codec, not a malformed input. The engine never returns
    /// best-effort data when this fires.
    InvariantViolation(String),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Io(e) => write!(f, "reading definitions file: {}", e),
            DriverError::Parse(e) => write!(f, "{}", e),
            DriverError::Reducer(e) => write!(f, "{}", e),
            DriverError::Modulation(e) => write!(f, "{}", e),
            DriverError::Remote(e) => write!(f, "remote exchange failed: {}", e),
            DriverError::InvariantViolation(msg) => write!(f, "invariant violation: {}", msg),
        }
    }
}

impl std::error::Error for DriverError {}

impl DriverError {
    /// Delegates to the wrapped error's kind so a caller several
    /// layers up (the CLI) can branch on category without matching on
    /// every crate's variant names.
    pub fn kind(&self) -> galaxy_base::ErrorKind {
        match self {
            DriverError::Io(_) => galaxy_base::ErrorKind::Invariant,
            DriverError::Parse(e) => e.kind(),
            DriverError::Reducer(e) => e.kind(),
            DriverError::Modulation(e) => e.kind(),
            DriverError::Remote(e) => e.kind(),
            DriverError::InvariantViolation(_) => galaxy_base::ErrorKind::Invariant,
        }
    }
}

impl From<std::io::Error> for DriverError {
    fn from(e: std::io::Error) -> Self {
        DriverError::Io(e)
    }
}

impl From<ParseError> for DriverError {
    fn from(e: ParseError) -> Self {
        DriverError::Parse(e)
    }
}

impl From<ReducerError> for DriverError {
    fn from(e: ReducerError) -> Self {
        DriverError::Reducer(e)
    }
}

impl From<ModulationError> for DriverError {
    fn from(e: ModulationError) -> Self {
        DriverError::Modulation(e)
    }
}

impl From<RemoteError> for DriverError {
    fn from(e: RemoteError) -> Self {
        DriverError::Remote(e)
    }
}
