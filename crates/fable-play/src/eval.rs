//! Pure condition and state-change evaluation.
//!
//! Both functions are total over well-typed input and never mutate their
//! arguments, so they can be called freely from sessions, previews, and
//! tests without coordination.

use fable_story::{Choice, StoryState};

/// Whether a choice is available given the current state.
///
/// An absent (empty) condition is vacuously true. Otherwise every entry
/// must strictly equal the state's value for that key — a missing state
/// key fails the condition, and there is no type coercion (`"1"` never
/// satisfies a required `1`).
pub fn is_available(choice: &Choice, state: &StoryState) -> bool {
    choice
        .condition
        .iter()
        .all(|(key, required)| state.get(key) == Some(required))
}

/// Compute the state vector after applying a choice's `setState`.
///
/// Returns a new vector: every key in `changes` is added or overwritten,
/// everything else carries over unchanged. A shallow merge — never a
/// delete.
pub fn apply_state_change(state: &StoryState, changes: &StoryState) -> StoryState {
    let mut next = state.clone();
    for (key, value) in changes {
        next.insert(key.clone(), value.clone());
    }
    next
}
