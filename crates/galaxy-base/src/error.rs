//! The shared error taxonomy.
//!
//! Every fallible operation in the galaxy workspace fails with a
//! crate-local error type, but each of those types reports one of
//! these kinds so a caller can apply the right policy without
//! depending on every crate's concrete error enum.

use std::fmt;

/// Which policy bucket an error falls into.
///
/// No kind here is retried automatically inside the engine or driver.
/// `Remote` failures may be retried by a caller (e.g. the CLI); every
/// other kind is fatal to the current call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed "ap"-prefix token stream or definitions file.
    Parse,
    /// Malformed modulation bit-string.
    Modulation,
    /// An arithmetic or structural primitive was applied to a value of
    /// the wrong shape (e.g. `add` on a non-integer).
    TypeMismatch,
    /// An atom had no primitive meaning and no binding in the
    /// environment.
    UndefinedAtom,
    /// The reducer's step budget was exhausted before reaching a
    /// normal form.
    EvaluationBudgetExceeded,
    /// The remote modulation exchange failed (non-200 response,
    /// timeout, or transport error).
    Remote,
    /// An internal consistency check failed — a bug in the reducer or
    /// codec, not a malformed input.
    Invariant,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Parse => "parse error",
            ErrorKind::Modulation => "modulation error",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::UndefinedAtom => "undefined atom",
            ErrorKind::EvaluationBudgetExceeded => "evaluation budget exceeded",
            ErrorKind::Remote => "remote failure",
            ErrorKind::Invariant => "invariant violation",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase_and_stable() {
        assert_eq!(ErrorKind::Parse.to_string(), "parse error");
        assert_eq!(ErrorKind::Invariant.to_string(), "invariant violation");
    }
}
