//! # galaxy-engine
//!
//! The Galaxy combinator language's core: expression model, textual
//! codec, modulation codec, vector view, and lazy memoizing reducer.
//!
//! # Module Structure
//!
//! - [`expr`] — the expression tree (atoms, applications, eval slots)
//! - [`textual`] — the "ap"-prefix parser/unparser and definitions loader
//! - [`modulation`] — the wire bit-string codec
//! - [`vector`] — the host-friendly tuple/list view
//! - [`reducer`] — weak-head normalization against an [`textual::Environment`]
//!
//! This crate has no knowledge of HTTP, stdin, or any other I/O; it is
//! a pure expression engine. [`galaxy-driver`](../galaxy_driver/index.html)
//! builds the interaction protocol on top of it.

pub mod expr;
pub mod modulation;
pub mod reducer;
pub mod textual;
pub mod vector;

pub use expr::Expr;
pub use modulation::{demodulate, demodulate_partial, modulate, ModulationError};
pub use reducer::{evaluate, evaluate_int, evaluate_with_stats, ReduceStats, ReducerError};
pub use textual::{load_definitions, parse, unparse, Environment, ParseError};
pub use vector::{unvectorize, vectorize, View};
