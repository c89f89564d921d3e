//! Error types for lowering

use pn_scope::ScopeError;

/// Result alias for lowering operations
pub type Result<T> = std::result::Result<T, LowerError>;

/// Errors that abort a lowering pass
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    /// Node kind with no lowering rule
    #[error("No visit method implemented for {kind}")]
    UnsupportedNode {
        /// Node class name
        kind: String,
    },

    /// Operator outside the table for its position
    #[error("{context} operator mapping not implemented for {operator}")]
    UnsupportedOperator {
        /// Operator class name
        operator: String,
        /// Which table was consulted
        context: &'static str,
    },

    /// Tree shape that violates a lowering invariant
    #[error("{message}")]
    Structural {
        /// Description of the violation
        message: String,
    },

    /// Scope chain misuse
    #[error(transparent)]
    Scope(#[from] ScopeError),
}

impl LowerError {
    /// Structural violation with a message
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural {
            message: message.into(),
        }
    }

    /// True for language-coverage gaps rather than malformed trees
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedNode { .. } | Self::UnsupportedOperator { .. }
        )
    }
}
