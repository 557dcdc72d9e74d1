//! Static validation of story documents and builder graphs.
//!
//! Validation is a pure function of its input: no side effects, no shared
//! state, safe to re-run on every edit. Errors block export and mark a
//! story unplayable; warnings are advisory and never alter control flow.

use std::collections::{HashMap, HashSet, VecDeque};

use fable_story::Story;

use crate::diagnostics::{Diagnostic, ValidationReport};
use crate::graph::{BuilderGraph, NodeId, NodePayload};

/// Validate a story document.
///
/// Errors: missing metadata fields, a `start` that does not key into
/// `passages`, and choices with empty or dangling `goto` targets.
/// Warnings: empty choice text, passages that neither offer choices nor
/// end the story, and passages unreachable from `start`. The
/// reachability pass is skipped when the start reference is invalid —
/// there is no meaningful root to traverse from.
pub fn validate_story(story: &Story) -> ValidationReport {
    let mut report = ValidationReport::new();

    if story.id.is_empty() {
        report.push(Diagnostic::error("missing-id", "Story has no id"));
    }
    if story.title.is_empty() {
        report.push(Diagnostic::error("missing-title", "Story has no title"));
    }
    if story.author.is_empty() {
        report.push(Diagnostic::error("missing-author", "Story has no author"));
    }
    if story.start.is_empty() {
        report.push(Diagnostic::error("missing-start", "Story has no start passage"));
    }
    if story.passages.is_empty() {
        report.push(Diagnostic::error("no-passages", "Story has no passages"));
    }

    let start_valid = story.has_passage(&story.start);
    if !story.start.is_empty() && !story.passages.is_empty() && !start_valid {
        report.push(
            Diagnostic::error(
                "start-not-found",
                format!("Start passage \"{}\" does not exist", story.start),
            )
            .with_node(story.start.clone()),
        );
    }

    for (passage_id, passage) in &story.passages {
        for (index, choice) in passage.choices.iter().enumerate() {
            if choice.goto.is_empty() {
                report.push(
                    Diagnostic::error(
                        "missing-goto",
                        format!("Choice {} in \"{passage_id}\" has no target", index + 1),
                    )
                    .with_node(passage_id.clone()),
                );
            } else if !story.has_passage(&choice.goto) {
                report.push(
                    Diagnostic::error(
                        "dangling-goto",
                        format!(
                            "Choice {} in \"{passage_id}\" references non-existent passage \"{}\"",
                            index + 1,
                            choice.goto
                        ),
                    )
                    .with_node(passage_id.clone()),
                );
            }
            if choice.text.is_empty() {
                report.push(
                    Diagnostic::warning(
                        "empty-choice-text",
                        format!("Choice {} in \"{passage_id}\" has no text", index + 1),
                    )
                    .with_node(passage_id.clone()),
                );
            }
        }

        if passage.choices.is_empty() && !passage.is_ending {
            report.push(
                Diagnostic::warning(
                    "dead-end",
                    format!("Passage \"{passage_id}\" has no choices and is not an ending"),
                )
                .with_node(passage_id.clone()),
            );
        }
    }

    if start_valid {
        for passage_id in unreachable_passages(story) {
            report.push(
                Diagnostic::warning(
                    "unreachable",
                    format!("Passage \"{passage_id}\" is not reachable from start"),
                )
                .with_node(passage_id),
            );
        }
    }

    report
}

/// Passage identifiers never reached by breadth-first traversal over
/// choice edges from `start`. Dequeued passages are never revisited, so
/// cycles and self-loops cannot loop the traversal.
fn unreachable_passages(story: &Story) -> Vec<String> {
    let mut reached: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(story.start.as_str());

    while let Some(id) = queue.pop_front() {
        if !reached.insert(id) {
            continue;
        }
        if let Some(passage) = story.passage(id) {
            for choice in &passage.choices {
                if story.has_passage(&choice.goto) && !reached.contains(choice.goto.as_str()) {
                    queue.push_back(choice.goto.as_str());
                }
            }
        }
    }

    story
        .passages
        .keys()
        .filter(|id| !reached.contains(id.as_str()))
        .cloned()
        .collect()
}

/// Validate a builder graph before compilation.
///
/// These are the editing-time checks: exactly one start node, at least
/// one ending, every non-ending node connected onward, every choice
/// handle wired, passage identifiers present and unique. Reachability
/// and ending-reachability are reported as warnings, as are unset
/// metadata fields and empty display text.
pub fn validate_graph(graph: &BuilderGraph) -> ValidationReport {
    let mut report = ValidationReport::new();

    let start_nodes = graph.start_nodes();
    if start_nodes.is_empty() {
        report.push(Diagnostic::error("no-start", "Story needs a Start node"));
    } else if start_nodes.len() > 1 {
        report.push(
            Diagnostic::error("multiple-starts", "Only one Start node allowed")
                .with_node(start_nodes[1].id.as_str()),
        );
    }

    let has_ending = graph
        .nodes
        .iter()
        .any(|n| matches!(n.payload, NodePayload::Ending { .. }));
    if !has_ending && !graph.nodes.is_empty() {
        report.push(Diagnostic::error(
            "no-ending",
            "Story needs at least one Ending node",
        ));
    }

    if graph.metadata.id.trim().is_empty() {
        report.push(Diagnostic::warning("no-story-id", "Story ID is not set"));
    }
    if graph.metadata.author.trim().is_empty() {
        report.push(Diagnostic::warning("no-author", "Author name is not set"));
    }

    for node in &graph.nodes {
        let outgoing = graph.edges_from(&node.id).count();

        match &node.payload {
            NodePayload::Start { .. } => {
                if outgoing == 0 {
                    report.push(
                        Diagnostic::error("disconnected", "Start has no outgoing connection")
                            .with_node(node.id.as_str()),
                    );
                }
            }
            NodePayload::Passage {
                passage_id,
                text,
                choices,
            } => {
                if outgoing == 0 {
                    report.push(
                        Diagnostic::error("disconnected", "Node has no outgoing connection")
                            .with_node(node.id.as_str()),
                    );
                }
                if text.trim().is_empty() {
                    report.push(
                        Diagnostic::warning("empty-passage", "Passage has no text")
                            .with_node(node.id.as_str()),
                    );
                }
                if passage_id.trim().is_empty() {
                    report.push(
                        Diagnostic::error("missing-passage-id", "Passage ID is required")
                            .with_node(node.id.as_str()),
                    );
                }
                for (index, stub) in choices.iter().enumerate() {
                    let connected = graph
                        .edges_from(&node.id)
                        .any(|e| e.source_handle.as_deref() == Some(stub.handle().as_str()));
                    if !connected {
                        report.push(
                            Diagnostic::error(
                                "unconnected-choice",
                                format!("Choice {} is not connected", index + 1),
                            )
                            .with_node(node.id.as_str()),
                        );
                    }
                    if stub.text.trim().is_empty() {
                        report.push(
                            Diagnostic::warning(
                                "empty-choice",
                                format!("Choice {} has no text", index + 1),
                            )
                            .with_node(node.id.as_str()),
                        );
                    }
                }
            }
            NodePayload::Ending {
                passage_id, text, ..
            } => {
                if text.trim().is_empty() {
                    report.push(
                        Diagnostic::warning("empty-ending", "Ending has no text")
                            .with_node(node.id.as_str()),
                    );
                }
                if passage_id.trim().is_empty() {
                    report.push(
                        Diagnostic::error("missing-ending-id", "Ending ID is required")
                            .with_node(node.id.as_str()),
                    );
                }
                if graph.edges_to(&node.id).count() == 0 {
                    report.push(
                        Diagnostic::warning("unreachable-ending", "Ending is not reachable")
                            .with_node(node.id.as_str()),
                    );
                }
            }
            NodePayload::State { .. } | NodePayload::Condition { .. } => {
                if outgoing == 0 {
                    report.push(
                        Diagnostic::error("disconnected", "Node has no outgoing connection")
                            .with_node(node.id.as_str()),
                    );
                }
            }
        }
    }

    // Duplicate passage identifiers across nodes.
    let mut claims: HashMap<&str, Vec<&NodeId>> = HashMap::new();
    for node in &graph.nodes {
        if let Some(passage_id) = node.payload.passage_id().filter(|id| !id.is_empty()) {
            claims.entry(passage_id).or_default().push(&node.id);
        }
    }
    let mut duplicates: Vec<_> = claims
        .into_iter()
        .filter(|(_, nodes)| nodes.len() > 1)
        .collect();
    duplicates.sort_by_key(|(id, _)| *id);
    for (passage_id, nodes) in duplicates {
        report.push(
            Diagnostic::error(
                "duplicate-id",
                format!("Duplicate passage ID: \"{passage_id}\""),
            )
            .with_node(nodes[1].as_str()),
        );
    }

    // Orphan nodes: anything a breadth-first walk from the start node
    // never reaches.
    if let Some(start) = start_nodes.first() {
        let mut reached: HashSet<&NodeId> = HashSet::new();
        let mut queue: VecDeque<&NodeId> = VecDeque::new();
        queue.push_back(&start.id);
        while let Some(id) = queue.pop_front() {
            if !reached.insert(id) {
                continue;
            }
            for edge in graph.edges_from(id) {
                if !reached.contains(&edge.target) {
                    queue.push_back(&edge.target);
                }
            }
        }
        for node in &graph.nodes {
            if !matches!(node.payload, NodePayload::Start { .. }) && !reached.contains(&node.id) {
                report.push(
                    Diagnostic::warning("orphan", "Node is not reachable from Start")
                        .with_node(node.id.as_str()),
                );
            }
        }
    }

    report
}
