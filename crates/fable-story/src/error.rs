/// Alias for `Result<T, StoryError>`.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors raised at the document-loading boundary.
///
/// The loader never partially populates a document: malformed JSON or a
/// document failing the schema gate is rejected whole. Callers present
/// the message; the core performs no logging.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// The input was not valid JSON or did not match the expected shape.
    #[error("invalid story JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required top-level field is missing or empty.
    #[error("story must have {0}")]
    MissingField(&'static str),

    /// The `start` field does not key into `passages`.
    #[error("start passage \"{0}\" not found in passages")]
    StartNotFound(String),
}
