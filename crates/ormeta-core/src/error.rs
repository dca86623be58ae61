//! Declaration error types.

use thiserror::Error;

/// Result type for declaration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while declaring models and properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A declaration received arguments it cannot accept.
    #[error("invalid argument for {entity}.{member}: {reason}")]
    InvalidArgument {
        /// Entity being declared.
        entity: String,
        /// Member being declared.
        member: String,
        /// What was wrong with the arguments.
        reason: String,
    },

    /// An array declaration on a member whose declared type is not a sequence.
    #[error("{entity}.{member} is declared as {declared}, expected a sequence type")]
    InvalidShapeMismatch {
        /// Entity being declared.
        entity: String,
        /// Member being declared.
        member: String,
        /// The member's declared shape.
        declared: String,
    },

    /// The entity has no model definition yet.
    #[error("model not declared: {0}")]
    ModelNotDeclared(String),
}

impl Error {
    pub(crate) fn invalid_argument(
        entity: &str,
        member: &str,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidArgument {
            entity: entity.to_string(),
            member: member.to_string(),
            reason: reason.into(),
        }
    }
}
