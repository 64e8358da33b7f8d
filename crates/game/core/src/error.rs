//! Common error infrastructure for barrow-core.
//!
//! Domain operations report recoverable outcomes ("cannot raise", "door is
//! locked", attack missed) through their `results` sequence, never through
//! `Err`. The error types here cover the remaining cases: structural
//! invariant violations and invalid inputs that indicate a content or code
//! bug rather than a legal game outcome.

use crate::state::{EntityId, Position};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    Validation,

    /// Internal error - unexpected state inconsistency. Indicates a bug.
    Internal,

    /// Fatal error - game state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Errors surfaced by engine operations.
///
/// A `StructuralViolation` aborts the current action (the turn is dropped)
/// but never unwinds the whole game; callers log it and continue with the
/// next actor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("entity {0} not found")]
    MissingEntity(EntityId),

    #[error("entity {entity} is missing required component {component}")]
    MissingComponent {
        entity: EntityId,
        component: &'static str,
    },

    #[error("position {0:?} is outside the map")]
    OutOfBounds(Position),

    #[error("unknown content id '{0}'")]
    UnknownContentId(String),

    #[error("structural invariant violated: {0}")]
    StructuralViolation(&'static str),
}

impl EngineError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingEntity(_) | Self::OutOfBounds(_) => ErrorSeverity::Validation,
            Self::UnknownContentId(_) => ErrorSeverity::Validation,
            Self::MissingComponent { .. } => ErrorSeverity::Internal,
            Self::StructuralViolation(_) => ErrorSeverity::Fatal,
        }
    }
}
