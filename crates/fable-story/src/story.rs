use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::StoryState;

/// How an ending is classified, used by readers for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndingType {
    /// A happy ending.
    Good,
    /// An unhappy ending.
    Bad,
    /// Neither good nor bad.
    Neutral,
}

impl fmt::Display for EndingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Bad => write!(f, "bad"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// A labeled, conditional edge from one passage to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// The text shown to the player.
    pub text: String,
    /// Target passage identifier.
    pub goto: String,
    /// State changes merged into the state vector when this choice is taken.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub set_state: StoryState,
    /// Required state values. The choice is offered only if every entry
    /// strictly equals the current state's value for that key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub condition: StoryState,
}

impl Choice {
    /// Create a choice with the given label and target passage.
    pub fn new(text: impl Into<String>, goto: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            goto: goto.into(),
            set_state: StoryState::new(),
            condition: StoryState::new(),
        }
    }

    /// Add a state change applied when the choice is taken.
    pub fn with_set(mut self, key: impl Into<String>, value: impl Into<crate::Value>) -> Self {
        self.set_state.insert(key.into(), value.into());
        self
    }

    /// Add a condition entry required for the choice to be available.
    pub fn with_condition(
        mut self,
        key: impl Into<String>,
        value: impl Into<crate::Value>,
    ) -> Self {
        self.condition.insert(key.into(), value.into());
        self
    }
}

/// A single narrative node in a story graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passage {
    /// Narrative content. Paragraphs are separated by a blank line.
    pub text: String,
    /// Ordered choices offered at the end of this passage. Document order
    /// drives numbered hotkeys, so it is never resorted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    /// When true, this passage ends the story and choices are ignored.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_ending: bool,
    /// Ending classification, meaningful only when `is_ending` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ending_type: Option<EndingType>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Passage {
    /// Create a passage with the given text and no choices.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
            is_ending: false,
            ending_type: None,
        }
    }

    /// Create an ending passage.
    pub fn ending(text: impl Into<String>, ending_type: EndingType) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
            is_ending: true,
            ending_type: Some(ending_type),
        }
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Split the passage text into paragraphs on blank lines.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// A complete story document, immutable once loaded.
///
/// This is the root entity of the `.adventure.json` format: metadata, an
/// initial state vector, and a directed graph of passages connected by
/// choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Unique identifier for the story.
    #[serde(default)]
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Author name.
    #[serde(default)]
    pub author: String,
    /// Short description shown in the library.
    #[serde(default)]
    pub description: String,
    /// Story format version.
    #[serde(default)]
    pub version: String,
    /// Optional cover image path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Initial values of the state vector.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub initial_state: StoryState,
    /// Identifier of the starting passage. Must key into `passages` for
    /// the document to be valid.
    #[serde(default)]
    pub start: String,
    /// All passages, keyed by passage identifier.
    #[serde(default)]
    pub passages: BTreeMap<String, Passage>,
}

impl Story {
    /// Create an empty story with the given id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: String::new(),
            description: String::new(),
            version: "1.0".to_string(),
            cover: None,
            initial_state: StoryState::new(),
            start: String::new(),
            passages: BTreeMap::new(),
        }
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the starting passage identifier.
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = start.into();
        self
    }

    /// Add a passage under the given identifier.
    pub fn with_passage(mut self, id: impl Into<String>, passage: Passage) -> Self {
        self.passages.insert(id.into(), passage);
        self
    }

    /// Set an initial state variable.
    pub fn with_initial(mut self, key: impl Into<String>, value: impl Into<crate::Value>) -> Self {
        self.initial_state.insert(key.into(), value.into());
        self
    }

    /// Look up a passage by identifier.
    pub fn passage(&self, id: &str) -> Option<&Passage> {
        self.passages.get(id)
    }

    /// Whether a passage with the given identifier exists.
    pub fn has_passage(&self, id: &str) -> bool {
        self.passages.contains_key(id)
    }

    /// Total number of passages.
    pub fn passage_count(&self) -> usize {
        self.passages.len()
    }

    /// Identifiers of all ending passages, in document order.
    pub fn endings(&self) -> Vec<&str> {
        self.passages
            .iter()
            .filter(|(_, p)| p.is_ending)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}
