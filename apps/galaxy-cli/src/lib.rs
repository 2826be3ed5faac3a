//! `galaxy` — command-line front end for the Galaxy combinator
//! language.
//!
//! All command logic lives here in the library crate; `main.rs` is a
//! thin wrapper that prints errors and sets the exit code.

pub mod cli;
mod error;

pub use cli::run_cli;
pub use error::CliError;
