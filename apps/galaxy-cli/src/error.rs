//! The CLI's umbrella error: every lower crate's error type folded
//! into one thing `main` can print and set an exit code from.

use std::fmt;

use galaxy_driver::DriverError;
use galaxy_engine::{ModulationError, ParseError, ReducerError};

#[derive(Debug)]
pub enum CliError {
    Io(std::io::Error),
    Parse(ParseError),
    Reducer(ReducerError),
    Modulation(ModulationError),
    Driver(DriverError),
    /// A malformed command-line input that isn't any lower crate's
    /// concern: a bad click-event line, a missing API key.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{}", e),
            CliError::Parse(e) => write!(f, "{}", e),
            CliError::Reducer(e) => write!(f, "{}", e),
            CliError::Modulation(e) => write!(f, "{}", e),
            CliError::Driver(e) => write!(f, "{}", e),
            CliError::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn kind(&self) -> galaxy_base::ErrorKind {
        match self {
            CliError::Io(_) => galaxy_base::ErrorKind::Invariant,
            CliError::Parse(e) => e.kind(),
            CliError::Reducer(e) => e.kind(),
            CliError::Modulation(e) => e.kind(),
            CliError::Driver(e) => e.kind(),
            CliError::Usage(_) => galaxy_base::ErrorKind::Invariant,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::Parse(e)
    }
}

impl From<ReducerError> for CliError {
    fn from(e: ReducerError) -> Self {
        CliError::Reducer(e)
    }
}

impl From<ModulationError> for CliError {
    fn from(e: ModulationError) -> Self {
        CliError::Modulation(e)
    }
}

impl From<DriverError> for CliError {
    fn from(e: DriverError) -> Self {
        CliError::Driver(e)
    }
}
