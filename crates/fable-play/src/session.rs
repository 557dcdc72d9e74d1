//! The per-player playback session.

use fable_story::{Choice, EndingType, Passage, Story};

use crate::error::{PlayError, PlayResult};
use crate::eval::{apply_state_change, is_available};
use fable_story::StoryState;

/// One playback of a story: current passage, history, and state vector.
///
/// A session owns its state exclusively and shares nothing with other
/// sessions; the story document it reads is never mutated. Creating a
/// session is the `Unloaded -> Active` transition; dropping it is the
/// reverse. All operations are synchronous, finite computations over
/// in-memory data.
#[derive(Debug, Clone)]
pub struct Session {
    story: Story,
    current: String,
    history: Vec<String>,
    state: StoryState,
}

impl Session {
    /// Start a session at the story's starting passage.
    ///
    /// The state vector is a copy of the story's `initialState` and the
    /// history is empty. Fails if `start` does not key into `passages`.
    pub fn load(story: Story) -> PlayResult<Self> {
        if !story.has_passage(&story.start) {
            return Err(PlayError::InvalidStartReference(story.start.clone()));
        }
        let current = story.start.clone();
        let state = story.initial_state.clone();
        Ok(Self {
            story,
            current,
            history: Vec::new(),
            state,
        })
    }

    /// The story being played.
    pub fn story(&self) -> &Story {
        &self.story
    }

    /// Identifier of the current passage.
    pub fn current_passage_id(&self) -> &str {
        &self.current
    }

    /// The current passage, or `None` if the current identifier resolves
    /// to no passage (a broken link in a mid-edit story). The UI renders
    /// a recovery affordance for `None` rather than treating it as fatal.
    pub fn current_passage(&self) -> Option<&Passage> {
        self.story.passage(&self.current)
    }

    /// The current state vector.
    pub fn state(&self) -> &StoryState {
        &self.state
    }

    /// Previously visited passage identifiers, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Whether [`Session::go_back`] would move anywhere.
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Whether the current passage ends the story.
    pub fn is_ending(&self) -> bool {
        self.current_passage().is_some_and(|p| p.is_ending)
    }

    /// The ending classification, when the current passage is an ending.
    pub fn ending_type(&self) -> Option<EndingType> {
        self.current_passage()
            .filter(|p| p.is_ending)
            .and_then(|p| p.ending_type)
    }

    /// Choices currently offered to the player, in document order.
    ///
    /// The ordered subsequence of the current passage's choices whose
    /// conditions hold. Empty when the passage is missing, has no
    /// choices, or is an ending. Order drives numbered hotkeys and is
    /// never resorted.
    pub fn available_choices(&self) -> Vec<&Choice> {
        let Some(passage) = self.current_passage() else {
            return Vec::new();
        };
        if passage.is_ending {
            return Vec::new();
        }
        passage
            .choices
            .iter()
            .filter(|c| is_available(c, &self.state))
            .collect()
    }

    /// Take a choice by its index into [`Session::available_choices`].
    ///
    /// Pushes the current passage onto the history, merges the choice's
    /// `setState` into the state vector, and moves to its `goto`. The
    /// target is deliberately not checked against `passages`: a story
    /// may be mid-edit when tested, and a missing target becomes the
    /// broken-link state reported by [`Session::current_passage`].
    pub fn choose(&mut self, index: usize) -> PlayResult<()> {
        let choice = self
            .available_choices()
            .get(index)
            .copied()
            .cloned()
            .ok_or(PlayError::InvalidChoice(index))?;

        self.history.push(self.current.clone());
        self.state = apply_state_change(&self.state, &choice.set_state);
        self.current = choice.goto;
        Ok(())
    }

    /// Return to the previously visited passage.
    ///
    /// No-op when the history is empty. The state vector is not
    /// reverted: going back to reread earlier text does not erase
    /// consequences already recorded. That asymmetry is intentional and
    /// load-bearing for stories that gate choices on earlier decisions.
    pub fn go_back(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.current = previous;
        }
    }

    /// Reset to the starting passage with a fresh state vector and an
    /// empty history, as if the story had just been loaded.
    pub fn restart(&mut self) {
        self.current = self.story.start.clone();
        self.state = self.story.initial_state.clone();
        self.history.clear();
    }
}
