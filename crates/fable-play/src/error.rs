/// Alias for `Result<T, PlayError>`.
pub type PlayResult<T> = Result<T, PlayError>;

/// Errors that can occur during playback.
///
/// Resolving a choice to a passage that does not exist is deliberately
/// not in this list: mid-edit stories are playable for testing, so a
/// broken link is a session state the UI renders, not a failure.
#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    /// The story's `start` does not key into its `passages`.
    #[error("start passage \"{0}\" not found in passages")]
    InvalidStartReference(String),

    /// The choice index is outside the available choices.
    #[error("invalid choice: {0}")]
    InvalidChoice(usize),
}
