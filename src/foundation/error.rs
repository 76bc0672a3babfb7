/// Convenience result type used across Storyreel.
pub type StoryreelResult<T> = Result<T, StoryreelError>;

/// Top-level error taxonomy used by the compiler APIs.
#[derive(thiserror::Error, Debug)]
pub enum StoryreelError {
    /// Invalid project data or compile options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when reading project JSON or writing the XML document.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoryreelError {
    /// Build a [`StoryreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StoryreelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for StoryreelError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
