//! # galaxy-base
//!
//! Foundational types shared by every crate in the galaxy workspace.
//!
//! This crate has no knowledge of the Galaxy language's grammar, wire
//! format, or reduction rules. It provides only the two things every
//! other crate needs:
//!
//! - [`Int`] — the arbitrary-precision integer type expression literals
//!   and modulation magnitudes are stored as.
//! - [`ErrorKind`] — the error taxonomy from the system's error handling
//!   design, used by every crate's own error type to tag which policy
//!   (fatal-to-call, fatal-to-load, ...) applies.
//!
//! # Design Principles
//!
//! Each crate boundary (`galaxy-engine`, `galaxy-driver`) defines its own
//! concrete error enum rather than sharing one umbrella type; this crate
//! only supplies the common `ErrorKind` tag so a caller several layers up
//! (the CLI) can log and branch on error category without matching on
//! every crate's variant names.

mod error;

pub use error::ErrorKind;

/// Arbitrary-precision signed integer, used throughout the engine for
/// expression literals and modulation magnitudes.
pub type Int = num_bigint::BigInt;
