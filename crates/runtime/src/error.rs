//! Runtime error types.

/// Errors surfaced by session orchestration and persistence.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unknown content id '{0}'")]
    UnknownContent(String),

    #[error("stairs transition denied: {0}")]
    StairsDenied(&'static str),

    #[error("save slot '{0}' not found")]
    MissingSave(String),
}
