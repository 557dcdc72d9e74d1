use serde::{Deserialize, Serialize};

/// One library entry pointing at a story file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Story identifier, matching the story document's `id`.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Short description for the library view.
    #[serde(default)]
    pub description: String,
    /// Optional cover image path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// File name of the story document, conventionally `<id>.adventure.json`.
    pub file: String,
    /// Optional tags for filtering.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// The library manifest listing all available stories.
///
/// An external collaborator fetches this and the individual story files;
/// the core only models the shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// All listed stories.
    pub stories: Vec<ManifestEntry>,
}

impl Manifest {
    /// Find an entry by story identifier.
    pub fn find(&self, id: &str) -> Option<&ManifestEntry> {
        self.stories.iter().find(|e| e.id == id)
    }
}
