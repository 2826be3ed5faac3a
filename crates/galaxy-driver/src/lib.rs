//! # galaxy-driver
//!
//! The interaction protocol on top of [`galaxy_engine`]: load a
//! definitions file, then repeatedly feed it a state and an event,
//! following remote modulation exchanges until the program yields a
//! result for the host to render.
//!
//! This crate knows about HTTP (via [`HttpRemote`]) but nothing about
//! stdin, terminals, or argument parsing — that lives in `galaxy-cli`.

mod engine;
mod error;
mod remote;

pub use engine::Engine;
pub use error::DriverError;
pub use remote::{HttpRemote, Remote, RemoteError, StubRemote, DEFAULT_TIMEOUT};
