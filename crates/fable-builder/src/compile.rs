//! Compiling a builder graph into a story document.

use std::collections::HashSet;

use fable_story::{Choice, EndingType, Passage, Story, StoryState};

use crate::graph::{BuilderGraph, Node, NodeId, NodePayload};

/// Default label for a choice left without text.
const DEFAULT_CHOICE_TEXT: &str = "Continue";

/// Compile a builder graph into a story document.
///
/// This is a total function: a malformed graph still compiles, with
/// unresolved connections becoming empty `goto` targets for the validator
/// to flag. Export gating is the caller's job via
/// [`crate::validate_graph`] and [`crate::validate_story`].
pub fn compile(graph: &BuilderGraph) -> Story {
    let metadata = &graph.metadata;

    let title = if metadata.title.is_empty() {
        "Untitled Story".to_string()
    } else {
        metadata.title.clone()
    };
    let id = if metadata.id.is_empty() {
        generate_story_id(&title)
    } else {
        metadata.id.clone()
    };

    let mut story = Story::new(id, title);
    story.author = if metadata.author.is_empty() {
        "Anonymous".to_string()
    } else {
        metadata.author.clone()
    };
    story.description = metadata.description.clone();
    story.cover = metadata.cover.clone();
    story.version = if metadata.version.is_empty() {
        "1.0".to_string()
    } else {
        metadata.version.clone()
    };

    for node in &graph.nodes {
        match &node.payload {
            NodePayload::Passage {
                passage_id,
                text,
                choices,
            } => {
                let key = passage_key(node, passage_id);
                let mut passage = Passage::new(text.clone());
                for stub in choices {
                    let edge = graph
                        .edges_from(&node.id)
                        .find(|e| e.source_handle.as_deref() == Some(stub.handle().as_str()));
                    let resolved = resolve_target(graph, edge.map(|e| &e.target));

                    let text = if stub.text.is_empty() {
                        DEFAULT_CHOICE_TEXT.to_string()
                    } else {
                        stub.text.clone()
                    };
                    let mut choice = Choice::new(text, resolved.passage_id);

                    // Auxiliary nodes apply first; inline entries win on
                    // key collisions.
                    choice.set_state = resolved.set_state;
                    choice.set_state.extend(stub.set_state.clone());
                    choice.condition = resolved.condition;
                    choice.condition.extend(stub.condition.clone());

                    passage.choices.push(choice);
                }
                story.passages.insert(key, passage);
            }
            NodePayload::Ending {
                passage_id,
                text,
                ending_type,
            } => {
                let key = passage_key(node, passage_id);
                story
                    .passages
                    .insert(key, Passage::ending(text.clone(), *ending_type));
            }
            NodePayload::Start { .. } | NodePayload::State { .. } | NodePayload::Condition { .. } => {}
        }
    }

    if let Some(start_node) = graph.start_nodes().first() {
        if let NodePayload::Start { initial_state, .. } = &start_node.payload {
            for var in initial_state {
                if !var.key.is_empty() {
                    story
                        .initial_state
                        .insert(var.key.clone(), var.value.clone());
                }
            }
        }

        let start_edge = graph.edges_from(&start_node.id).next();
        story.start = resolve_target(graph, start_edge.map(|e| &e.target)).passage_id;
    }

    story
}

/// Generate a story identifier from the title: lowercase, alphanumerics
/// and spaces only, spaces to hyphens, capped at 50 characters.
pub fn generate_story_id(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let slug: String = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(50)
        .collect();
    if slug.is_empty() {
        "untitled-story".to_string()
    } else {
        slug
    }
}

/// Outcome of following a choice connection to a concrete passage.
struct Resolved {
    /// Target passage identifier; empty when the chain never reaches a
    /// passage (dangling or cyclic).
    passage_id: String,
    /// State changes accumulated from auxiliary state nodes on the path.
    set_state: StoryState,
    /// Conditions accumulated from auxiliary condition nodes on the path.
    condition: StoryState,
}

/// Follow an edge target through auxiliary state/condition nodes until a
/// passage or ending is reached.
///
/// State nodes contribute their changes and forward along their single
/// outgoing edge; condition nodes contribute their tests and forward
/// along the `true` handle only — the `false` branch does not exist in
/// the linear story format. Cycles through auxiliary nodes terminate as
/// unresolved, compiling to an empty target.
fn resolve_target(graph: &BuilderGraph, target: Option<&NodeId>) -> Resolved {
    let mut resolved = Resolved {
        passage_id: String::new(),
        set_state: StoryState::new(),
        condition: StoryState::new(),
    };
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut current = target.cloned();

    while let Some(id) = current {
        if !visited.insert(id.clone()) {
            break;
        }
        let Some(node) = graph.node(&id) else {
            break;
        };

        match &node.payload {
            NodePayload::Passage { passage_id, .. } | NodePayload::Ending { passage_id, .. } => {
                resolved.passage_id = passage_key(node, passage_id);
                break;
            }
            NodePayload::State { changes } => {
                for var in changes {
                    if !var.key.is_empty() {
                        resolved.set_state.insert(var.key.clone(), var.value.clone());
                    }
                }
                current = graph.edges_from(&id).next().map(|e| e.target.clone());
            }
            NodePayload::Condition { tests } => {
                for var in tests {
                    if !var.key.is_empty() {
                        resolved.condition.insert(var.key.clone(), var.value.clone());
                    }
                }
                current = graph
                    .edges_from(&id)
                    .find(|e| e.source_handle.as_deref() == Some("true"))
                    .map(|e| e.target.clone());
            }
            NodePayload::Start { .. } => break,
        }
    }

    resolved
}

/// The passage key a node compiles under: its declared passage id, or
/// the node id when unset.
fn passage_key(node: &Node, passage_id: &str) -> String {
    if passage_id.is_empty() {
        node.id.as_str().to_string()
    } else {
        passage_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ChoiceStub, Position, StateVar};
    use fable_story::Value;

    fn passage_node(passage_id: &str, text: &str, choices: Vec<ChoiceStub>) -> NodePayload {
        NodePayload::Passage {
            passage_id: passage_id.to_string(),
            text: text.to_string(),
            choices,
        }
    }

    fn linear_graph() -> BuilderGraph {
        let mut graph = BuilderGraph::new();
        graph.metadata.title = "The Cellar".to_string();
        graph.metadata.author = "A. Nonymous".to_string();

        let start = graph.add_node(
            NodePayload::Start {
                label: "Story Start".to_string(),
                initial_state: vec![StateVar::new("lamp", true)],
            },
            Position::new(100.0, 50.0),
        );
        let intro = graph.add_node(
            passage_node("intro", "Stairs lead down.", vec![ChoiceStub::new("c1", "Descend")]),
            Position::default(),
        );
        let end = graph.add_node(
            NodePayload::Ending {
                passage_id: "bottom".to_string(),
                text: "You reach the bottom.".to_string(),
                ending_type: EndingType::Neutral,
            },
            Position::default(),
        );

        graph.connect(start, None, intro.clone());
        let handle = Some("choice-c1".to_string());
        graph.connect(intro, handle, end);
        graph
    }

    #[test]
    fn compiles_metadata_start_and_passages() {
        let story = compile(&linear_graph());

        assert_eq!(story.id, "the-cellar");
        assert_eq!(story.title, "The Cellar");
        assert_eq!(story.author, "A. Nonymous");
        assert_eq!(story.version, "1.0");
        assert_eq!(story.start, "intro");
        assert_eq!(story.initial_state["lamp"], Value::Bool(true));

        let intro = story.passage("intro").unwrap();
        assert_eq!(intro.choices.len(), 1);
        assert_eq!(intro.choices[0].goto, "bottom");
        assert!(story.passage("bottom").unwrap().is_ending);
    }

    #[test]
    fn empty_choice_text_defaults_to_continue() {
        let mut graph = linear_graph();
        for node in &mut graph.nodes {
            if let NodePayload::Passage { choices, .. } = &mut node.payload {
                choices[0].text = String::new();
            }
        }
        let story = compile(&graph);
        assert_eq!(story.passage("intro").unwrap().choices[0].text, "Continue");
    }

    #[test]
    fn unconnected_choice_compiles_to_empty_goto() {
        let mut graph = BuilderGraph::new();
        graph.add_node(
            passage_node("lonely", "Nowhere to go.", vec![ChoiceStub::new("c1", "Try")]),
            Position::default(),
        );

        let story = compile(&graph);
        let passage = story.passage("lonely").unwrap();
        assert_eq!(passage.choices.len(), 1, "unresolved choices are kept");
        assert_eq!(passage.choices[0].goto, "");
    }

    #[test]
    fn resolves_through_state_node() {
        let mut graph = BuilderGraph::new();
        let source = graph.add_node(
            passage_node("hall", "A hall.", vec![ChoiceStub::new("c1", "Take the key")]),
            Position::default(),
        );
        let state = graph.add_node(
            NodePayload::State {
                changes: vec![StateVar::new("hasKey", true), StateVar::new("gold", 2)],
            },
            Position::default(),
        );
        let target = graph.add_node(
            NodePayload::Ending {
                passage_id: "vault".to_string(),
                text: "Done.".to_string(),
                ending_type: EndingType::Good,
            },
            Position::default(),
        );

        graph.connect(source.clone(), Some("choice-c1".to_string()), state.clone());
        graph.connect(state, None, target);

        let story = compile(&graph);
        let choice = &story.passage("hall").unwrap().choices[0];
        assert_eq!(choice.goto, "vault");
        assert_eq!(choice.set_state["hasKey"], Value::Bool(true));
        assert_eq!(choice.set_state["gold"], Value::from(2));
    }

    #[test]
    fn inline_entries_override_auxiliary_nodes() {
        let mut graph = BuilderGraph::new();
        let stub = ChoiceStub::new("c1", "Go").with_set("gold", 10);
        let source = graph.add_node(passage_node("a", "A.", vec![stub]), Position::default());
        let state = graph.add_node(
            NodePayload::State {
                changes: vec![StateVar::new("gold", 1), StateVar::new("seen", true)],
            },
            Position::default(),
        );
        let target = graph.add_node(
            NodePayload::Ending {
                passage_id: "b".to_string(),
                text: "B.".to_string(),
                ending_type: EndingType::Neutral,
            },
            Position::default(),
        );
        graph.connect(source, Some("choice-c1".to_string()), state.clone());
        graph.connect(state, None, target);

        let story = compile(&graph);
        let choice = &story.passage("a").unwrap().choices[0];
        assert_eq!(choice.set_state["gold"], Value::from(10));
        assert_eq!(choice.set_state["seen"], Value::Bool(true));
    }

    #[test]
    fn condition_node_compiles_true_branch_only() {
        let mut graph = BuilderGraph::new();
        let source = graph.add_node(
            passage_node("gate", "A gate.", vec![ChoiceStub::new("c1", "Enter")]),
            Position::default(),
        );
        let cond = graph.add_node(
            NodePayload::Condition {
                tests: vec![StateVar::new("hasKey", true)],
            },
            Position::default(),
        );
        let inside = graph.add_node(
            NodePayload::Ending {
                passage_id: "inside".to_string(),
                text: "Inside.".to_string(),
                ending_type: EndingType::Good,
            },
            Position::default(),
        );
        let outside = graph.add_node(
            NodePayload::Ending {
                passage_id: "outside".to_string(),
                text: "Locked out.".to_string(),
                ending_type: EndingType::Bad,
            },
            Position::default(),
        );

        graph.connect(source, Some("choice-c1".to_string()), cond.clone());
        graph.connect(cond.clone(), Some("true".to_string()), inside);
        graph.connect(cond, Some("false".to_string()), outside);

        let story = compile(&graph);
        let choice = &story.passage("gate").unwrap().choices[0];
        assert_eq!(choice.goto, "inside");
        assert_eq!(choice.condition["hasKey"], Value::Bool(true));
    }

    #[test]
    fn auxiliary_cycle_terminates_as_unresolved() {
        let mut graph = BuilderGraph::new();
        let source = graph.add_node(
            passage_node("a", "A.", vec![ChoiceStub::new("c1", "Loop")]),
            Position::default(),
        );
        let s1 = graph.add_node(NodePayload::State { changes: vec![] }, Position::default());
        let s2 = graph.add_node(NodePayload::State { changes: vec![] }, Position::default());

        graph.connect(source, Some("choice-c1".to_string()), s1.clone());
        graph.connect(s1.clone(), None, s2.clone());
        graph.connect(s2, None, s1);

        let story = compile(&graph);
        assert_eq!(story.passage("a").unwrap().choices[0].goto, "");
    }

    #[test]
    fn missing_passage_id_falls_back_to_node_id() {
        let mut graph = BuilderGraph::new();
        graph.add_node(passage_node("", "Unnamed.", vec![]), Position::default());
        let story = compile(&graph);
        assert!(story.has_passage("passage-1"));
    }

    #[test]
    fn start_resolves_through_auxiliary_nodes() {
        let mut graph = linear_graph();
        // Splice a state node between start and intro.
        let state = graph.add_node(
            NodePayload::State {
                changes: vec![],
            },
            Position::default(),
        );
        let intro_id = graph
            .nodes
            .iter()
            .find(|n| n.payload.passage_id() == Some("intro"))
            .unwrap()
            .id
            .clone();
        for edge in &mut graph.edges {
            if edge.target == intro_id && edge.source.as_str().starts_with("start") {
                edge.target = state.clone();
            }
        }
        graph.connect(state, None, intro_id);

        assert_eq!(compile(&graph).start, "intro");
    }

    #[test]
    fn story_id_generation_slugifies_title() {
        assert_eq!(generate_story_id("The Cellar!"), "the-cellar");
        assert_eq!(generate_story_id("  "), "untitled-story");
        assert_eq!(generate_story_id("A  B"), "a-b");
    }

    #[test]
    fn graph_without_start_node_compiles_with_empty_start() {
        let mut graph = BuilderGraph::new();
        graph.add_node(passage_node("a", "A.", vec![]), Position::default());
        let story = compile(&graph);
        assert_eq!(story.start, "");
    }
}
