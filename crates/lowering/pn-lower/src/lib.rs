//! Pine syntax tree → ESTree lowering
//!
//! This crate handles:
//! - Declaration vs. reassignment decisions from the scope chain
//! - Parameter renaming when a parameter shadows an outer binding
//! - Rewriting shared mutable globals referenced from function bodies
//! - `input(...)` type inference and `defval` argument normalization
//! - Node-by-node lowering into the ESTree vocabulary

pub mod config;
pub mod error;
pub mod input_args;
pub mod lower;
pub mod ops;

pub use config::LowerConfig;
pub use error::{LowerError, Result};
pub use lower::{LoweringSession, lower_program};
