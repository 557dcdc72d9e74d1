//! The editing-time node/edge representation of a story.
//!
//! This graph is what the authoring tool manipulates; it is not the story
//! document. [`crate::compile`] turns it into a [`fable_story::Story`] and
//! [`crate::decompile`] turns a story back into a graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use fable_story::{EndingType, StoryState, Value};

/// Identifier of a node within a builder graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// View the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Canvas coordinates of a node. Cosmetic only — positions carry no
/// semantic weight and may differ across decompile runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One declared state variable on a start or auxiliary state node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVar {
    /// Variable name.
    pub key: String,
    /// Assigned or required value.
    pub value: Value,
}

impl StateVar {
    /// Create a state variable entry.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A choice as edited on a passage node.
///
/// The outgoing connection lives on the edge whose source handle is
/// [`ChoiceStub::handle`]; the target passage is resolved at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceStub {
    /// Identifier unique within the owning node, used to match edges.
    pub id: String,
    /// Label shown to the player.
    pub text: String,
    /// Inline state changes applied when the choice is taken.
    #[serde(default, skip_serializing_if = "StoryState::is_empty")]
    pub set_state: StoryState,
    /// Inline availability conditions.
    #[serde(default, skip_serializing_if = "StoryState::is_empty")]
    pub condition: StoryState,
}

impl ChoiceStub {
    /// Create a choice stub.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            set_state: StoryState::new(),
            condition: StoryState::new(),
        }
    }

    /// Add an inline state change.
    pub fn with_set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_state.insert(key.into(), value.into());
        self
    }

    /// Add an inline condition entry.
    pub fn with_condition(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition.insert(key.into(), value.into());
        self
    }

    /// The edge source handle that carries this choice's connection.
    pub fn handle(&self) -> String {
        format!("choice-{}", self.id)
    }
}

/// Typed payload of a builder node.
///
/// A tagged sum type rather than a string-discriminated blob, so the
/// translator's resolution logic is checked exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum NodePayload {
    /// The single entry point. Its outgoing edge determines the starting
    /// passage; its variables become the story's `initialState`.
    Start {
        /// Display label on the canvas.
        label: String,
        /// Initial state variables.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        initial_state: Vec<StateVar>,
    },
    /// A narrative passage with outgoing choices.
    Passage {
        /// Passage identifier in the compiled document. Falls back to
        /// the node identifier when unset.
        passage_id: String,
        /// Narrative text.
        text: String,
        /// Ordered choices. Order is an explicit attribute, never
        /// derived from a mapping's iteration order.
        choices: Vec<ChoiceStub>,
    },
    /// A terminal passage.
    Ending {
        /// Passage identifier in the compiled document.
        passage_id: String,
        /// Narrative text.
        text: String,
        /// Ending classification.
        ending_type: EndingType,
    },
    /// Auxiliary node applying state changes to any choice routed
    /// through it (legacy authoring schema).
    State {
        /// State changes to merge into routed choices.
        changes: Vec<StateVar>,
    },
    /// Auxiliary node attaching conditions to any choice routed through
    /// it (legacy authoring schema). Only the `true` branch compiles.
    Condition {
        /// Required state entries, compared by strict equality.
        tests: Vec<StateVar>,
    },
}

impl NodePayload {
    /// The payload's kind name, as used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Passage { .. } => "passage",
            Self::Ending { .. } => "ending",
            Self::State { .. } => "state",
            Self::Condition { .. } => "condition",
        }
    }

    /// The declared passage identifier, for passage and ending nodes.
    pub fn passage_id(&self) -> Option<&str> {
        match self {
            Self::Passage { passage_id, .. } | Self::Ending { passage_id, .. } => {
                Some(passage_id.as_str())
            }
            _ => None,
        }
    }
}

/// A node on the builder canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier, unique within the graph.
    pub id: NodeId,
    /// Canvas position.
    #[serde(default)]
    pub position: Position,
    /// Typed payload.
    #[serde(flatten)]
    pub payload: NodePayload,
}

/// A directed connection between node handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Edge identifier, unique within the graph.
    pub id: String,
    /// Source node.
    pub source: NodeId,
    /// Source handle: `choice-<id>` on passage nodes, `true`/`false` on
    /// condition nodes, absent for single-output nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Target node.
    pub target: NodeId,
}

/// Story metadata edited alongside the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryMetadata {
    /// Story identifier. Generated from the title at compile time if unset.
    #[serde(default)]
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Author name.
    #[serde(default)]
    pub author: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Story format version.
    #[serde(default)]
    pub version: String,
    /// Optional cover image path, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

/// A complete builder graph: nodes, edges, and story metadata.
///
/// Identifier minting is owned by the graph itself — a monotonic counter
/// per graph, so concurrent editing sessions in one process never collide
/// and tests get deterministic identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderGraph {
    /// Story metadata.
    #[serde(default)]
    pub metadata: StoryMetadata,
    /// All nodes.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// All edges.
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(skip)]
    next_id: u64,
}

impl BuilderGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh identifier with the given prefix.
    ///
    /// Skips identifiers already taken by a node or an edge, so minting
    /// stays safe after deserializing a draft that was produced by
    /// another session.
    pub fn mint(&mut self, prefix: &str) -> String {
        loop {
            self.next_id += 1;
            let candidate = format!("{prefix}-{}", self.next_id);
            let taken = self.nodes.iter().any(|n| n.id.as_str() == candidate)
                || self.edges.iter().any(|e| e.id == candidate);
            if !taken {
                return candidate;
            }
        }
    }

    /// Add a node with a freshly minted identifier. Returns the id.
    pub fn add_node(&mut self, payload: NodePayload, position: Position) -> NodeId {
        let id = NodeId(self.mint(payload.kind()));
        self.nodes.push(Node {
            id: id.clone(),
            position,
            payload,
        });
        id
    }

    /// Connect two nodes, minting an edge identifier.
    pub fn connect(&mut self, source: NodeId, source_handle: Option<String>, target: NodeId) {
        let id = self.mint("edge");
        self.edges.push(Edge {
            id,
            source,
            source_handle,
            target,
        });
    }

    /// Look up a node by identifier.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Edges leaving the given node.
    pub fn edges_from<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| &e.source == id)
    }

    /// Edges arriving at the given node.
    pub fn edges_to<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| &e.target == id)
    }

    /// All start-typed nodes, in insertion order.
    pub fn start_nodes(&self) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.payload, NodePayload::Start { .. }))
            .collect()
    }

    /// Parse a graph from its JSON draft format.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize the graph to its JSON draft format.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_ids_are_unique_per_graph() {
        let mut graph = BuilderGraph::new();
        let a = graph.add_node(
            NodePayload::Start {
                label: "Story Start".to_string(),
                initial_state: Vec::new(),
            },
            Position::default(),
        );
        let b = graph.add_node(
            NodePayload::Passage {
                passage_id: "intro".to_string(),
                text: String::new(),
                choices: Vec::new(),
            },
            Position::default(),
        );
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "start-1");
        assert_eq!(b.as_str(), "passage-2");
    }

    #[test]
    fn minting_skips_taken_ids() {
        let mut graph = BuilderGraph::new();
        graph.nodes.push(Node {
            id: NodeId::from("passage-1"),
            position: Position::default(),
            payload: NodePayload::Passage {
                passage_id: "intro".to_string(),
                text: String::new(),
                choices: Vec::new(),
            },
        });

        let id = graph.add_node(
            NodePayload::Passage {
                passage_id: "next".to_string(),
                text: String::new(),
                choices: Vec::new(),
            },
            Position::default(),
        );
        assert_eq!(id.as_str(), "passage-2");
    }

    #[test]
    fn minting_skips_taken_edge_ids() {
        // A deserialized draft carries edge ids but a reset counter.
        let json = r#"{
            "nodes": [],
            "edges": [{"id": "edge-1", "source": "a", "target": "b"}]
        }"#;
        let mut graph = BuilderGraph::from_json(json).unwrap();
        graph.connect(NodeId::from("b"), None, NodeId::from("c"));

        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[0].id, "edge-1");
        assert_eq!(graph.edges[1].id, "edge-2");
    }

    #[test]
    fn two_graphs_mint_independently() {
        let mut a = BuilderGraph::new();
        let mut b = BuilderGraph::new();
        assert_eq!(a.mint("passage"), "passage-1");
        assert_eq!(b.mint("passage"), "passage-1");
    }

    #[test]
    fn draft_json_round_trips() {
        let mut graph = BuilderGraph::new();
        graph.metadata.title = "Draft".to_string();
        let start = graph.add_node(
            NodePayload::Start {
                label: "Story Start".to_string(),
                initial_state: vec![StateVar::new("gold", 3)],
            },
            Position::new(100.0, 50.0),
        );
        let passage = graph.add_node(
            NodePayload::Passage {
                passage_id: "intro".to_string(),
                text: "Hello.".to_string(),
                choices: vec![ChoiceStub::new("c1", "Onward")],
            },
            Position::new(100.0, 240.0),
        );
        graph.connect(start, None, passage);

        let json = graph.to_json().unwrap();
        assert!(json.contains("\"type\": \"passage\""));

        let back = BuilderGraph::from_json(&json).unwrap();
        assert_eq!(back.nodes, graph.nodes);
        assert_eq!(back.edges, graph.edges);
        assert_eq!(back.metadata, graph.metadata);
    }
}
