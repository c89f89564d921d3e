//! Lexical scope tracking for the lowering pass
//!
//! Pine has no declaration syntax: the first assignment to a name declares
//! it, and top-level mutable bindings are visible from function bodies. The
//! [`ScopeChain`] records which names are declared at which function depth so
//! the lowering pass can decide between declaring and assigning, detect
//! parameters that shadow outer bindings, and spot references to shared
//! mutable globals.
//!
//! # Usage
//!
//! ```rust
//! use pn_scope::{BindingKind, ScopeChain};
//!
//! let mut chain = ScopeChain::new();
//! chain.declare("length", BindingKind::Mutable);
//! chain.push_level();
//! assert!(chain.is_shared_mutable_global("length"));
//! chain.pop_level().unwrap();
//! ```

pub mod chain;
pub mod error;

pub use chain::{BindingKind, ScopeChain};
pub use error::ScopeError;
