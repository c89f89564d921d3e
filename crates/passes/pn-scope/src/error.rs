//! Error types for scope tracking

/// Errors raised by [`ScopeChain`](crate::ScopeChain) operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// Pop requested while only the root level remains
    #[error("Cannot pop global scope")]
    PopRootLevel,
}
