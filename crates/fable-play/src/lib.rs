//! Playback engine for Fable stories.
//!
//! Consumes a validated [`fable_story::Story`] and a sequence of player
//! choices, producing navigation state. Pure condition/state evaluation
//! lives in [`eval`]; the per-player session machine lives in [`session`].

/// Error types for playback.
pub mod error;
/// Pure condition and state-change evaluation.
pub mod eval;
/// The per-player playback session.
pub mod session;

pub use error::{PlayError, PlayResult};
pub use eval::{apply_state_change, is_available};
pub use session::Session;
