//! Parsing and schema-checking of story and manifest JSON.
//!
//! Fetching bytes is the caller's concern; these functions only turn a
//! JSON string into a checked document or fail with a [`StoryError`].

use crate::error::{StoryError, StoryResult};
use crate::manifest::Manifest;
use crate::story::Story;

/// Parse and schema-check a story document from JSON.
///
/// Fails with [`StoryError::Parse`] on malformed JSON, and with
/// [`StoryError::MissingField`] / [`StoryError::StartNotFound`] when the
/// document fails the structural gate a reader relies on. Deeper checks
/// (dangling gotos, reachability) belong to the validator, which reports
/// rather than rejects.
pub fn load_story(json: &str) -> StoryResult<Story> {
    let story: Story = serde_json::from_str(json)?;

    if story.id.is_empty() {
        return Err(StoryError::MissingField("an id"));
    }
    if story.title.is_empty() {
        return Err(StoryError::MissingField("a title"));
    }
    if story.start.is_empty() {
        return Err(StoryError::MissingField("a start passage"));
    }
    if story.passages.is_empty() {
        return Err(StoryError::MissingField("passages"));
    }
    if !story.has_passage(&story.start) {
        return Err(StoryError::StartNotFound(story.start.clone()));
    }

    Ok(story)
}

/// Parse a library manifest from JSON.
pub fn load_manifest(json: &str) -> StoryResult<Manifest> {
    Ok(serde_json::from_str(json)?)
}
