//! Builder toolchain for Fable stories.
//!
//! The authoring tool works on a node/edge [`graph::BuilderGraph`];
//! this crate compiles that graph into a [`fable_story::Story`],
//! decompiles a story back into an editable graph, and statically
//! validates both representations.

/// Compiling a builder graph into a story document.
pub mod compile;
/// Decompiling a story document into a builder graph.
pub mod decompile;
/// Validation diagnostics and reports.
pub mod diagnostics;
/// The editing-time node/edge graph.
pub mod graph;
/// Static validation of documents and graphs.
pub mod validate;

pub use compile::{compile, generate_story_id};
pub use decompile::decompile;
pub use diagnostics::{Diagnostic, Severity, ValidationReport};
pub use graph::{BuilderGraph, ChoiceStub, Edge, Node, NodeId, NodePayload, Position, StateVar};
pub use validate::{validate_graph, validate_story};
