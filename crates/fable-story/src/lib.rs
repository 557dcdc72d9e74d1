//! Core types for Fable: the story document model behind `.adventure.json`.
//!
//! This crate defines the data that the builder compiles into and the
//! reader plays back. It is independent of both — you can construct a
//! [`Story`] programmatically or deserialize one from JSON.

/// Error types used throughout the crate.
pub mod error;
/// Parsing and schema-checking of story and manifest JSON.
pub mod loader;
/// The library manifest listing available stories.
pub mod manifest;
/// Story documents, passages, and choices.
pub mod story;
/// Scalar state values and the state vector.
pub mod value;

/// Re-export error types.
pub use error::{StoryError, StoryResult};
/// Re-export loader entry points.
pub use loader::{load_manifest, load_story};
/// Re-export manifest types.
pub use manifest::{Manifest, ManifestEntry};
/// Re-export story document types.
pub use story::{Choice, EndingType, Passage, Story};
/// Re-export state value types.
pub use value::{StoryState, Value};
