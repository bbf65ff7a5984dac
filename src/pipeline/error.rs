//! Pipeline error types.

/// The document body cannot be parsed under the source grammar.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// A render failed somewhere in the stage chain.
///
/// Recoverable at the per-document boundary: callers turn this into
/// "not found" for one document, never into a corpus-wide abort.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("stage '{stage}' failed: {message}")]
    Stage {
        stage: &'static str,
        message: String,
    },
}

impl RenderError {
    /// Create a stage-specific error.
    pub fn stage(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Stage {
            stage,
            message: message.into(),
        }
    }
}
