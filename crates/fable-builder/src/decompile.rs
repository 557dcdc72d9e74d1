//! Decompiling a story document back into an editable builder graph.

use std::collections::{BTreeMap, HashMap, VecDeque};

use fable_story::{EndingType, Story};

use crate::graph::{BuilderGraph, ChoiceStub, NodeId, NodePayload, Position, StateVar};

// Canvas metrics. Cosmetic only.
const NODE_WIDTH: f64 = 280.0;
const NODE_HEIGHT: f64 = 150.0;
const H_GAP: f64 = 60.0;
const V_GAP: f64 = 40.0;
const MARGIN_X: f64 = 100.0;
const MARGIN_Y: f64 = 50.0;

/// Decompile a story document into a builder graph.
///
/// Produces one start node, one node per passage (`ending` when the
/// passage is terminal), one edge per resolvable choice, and a synthetic
/// edge from the start node to the starting passage. Choice `setState`
/// and `condition` become inline per-choice metadata; auxiliary
/// state/condition nodes from the legacy authoring schema are not
/// reconstructed. A second round-trip caveat: a choice with empty text
/// comes back as `"Continue"`, because compilation fills the default
/// label.
///
/// Layout is topological leveling: breadth-first depth from `start`
/// assigns each passage a level, same-level nodes sit side by side, and
/// endings drop to the maximum level plus one regardless of their depth.
/// Coordinates are cosmetic and may differ across runs of different
/// implementations.
pub fn decompile(story: &Story) -> BuilderGraph {
    let mut graph = BuilderGraph::new();
    graph.metadata.id = story.id.clone();
    graph.metadata.title = story.title.clone();
    graph.metadata.author = story.author.clone();
    graph.metadata.description = story.description.clone();
    graph.metadata.cover = story.cover.clone();
    graph.metadata.version = if story.version.is_empty() {
        "1.0".to_string()
    } else {
        story.version.clone()
    };

    let levels = level_passages(story);

    // Group passages by level to place same-level nodes side by side.
    let mut per_level: BTreeMap<usize, usize> = BTreeMap::new();
    let mut position_of = |level: usize| -> Position {
        let index = per_level.entry(level).or_insert(0);
        let position = Position::new(
            MARGIN_X + (*index as f64) * (NODE_WIDTH + H_GAP),
            MARGIN_Y + (level as f64) * (NODE_HEIGHT + V_GAP),
        );
        *index += 1;
        position
    };

    let start_node = graph.add_node(
        NodePayload::Start {
            label: "Story Start".to_string(),
            initial_state: story
                .initial_state
                .iter()
                .map(|(k, v)| StateVar::new(k.clone(), v.clone()))
                .collect(),
        },
        position_of(0),
    );

    let mut node_of_passage: HashMap<&str, NodeId> = HashMap::new();
    for (passage_id, passage) in &story.passages {
        let position = position_of(levels[passage_id.as_str()]);
        let payload = if passage.is_ending {
            NodePayload::Ending {
                passage_id: passage_id.clone(),
                text: passage.text.clone(),
                ending_type: passage.ending_type.unwrap_or(EndingType::Neutral),
            }
        } else {
            let choices = passage
                .choices
                .iter()
                .map(|choice| {
                    let mut stub = ChoiceStub::new(graph.mint("choice"), choice.text.clone());
                    stub.set_state = choice.set_state.clone();
                    stub.condition = choice.condition.clone();
                    stub
                })
                .collect();
            NodePayload::Passage {
                passage_id: passage_id.clone(),
                text: passage.text.clone(),
                choices,
            }
        };
        let node_id = graph.add_node(payload, position);
        node_of_passage.insert(passage_id.as_str(), node_id);
    }

    if let Some(target) = node_of_passage.get(story.start.as_str()) {
        graph.connect(start_node, None, target.clone());
    }

    // One edge per choice whose goto resolves to a known passage.
    // Dangling gotos get no edge; graph validation flags the
    // unconnected choice handle.
    let mut pending = Vec::new();
    for (passage_id, passage) in &story.passages {
        if passage.is_ending {
            continue;
        }
        let source = node_of_passage[passage_id.as_str()].clone();
        let Some(node) = graph.node(&source) else {
            continue;
        };
        let NodePayload::Passage { choices, .. } = &node.payload else {
            continue;
        };
        for (stub, choice) in choices.iter().zip(&passage.choices) {
            if let Some(target) = node_of_passage.get(choice.goto.as_str()) {
                pending.push((source.clone(), Some(stub.handle()), target.clone()));
            }
        }
    }
    for (source, handle, target) in pending {
        graph.connect(source, handle, target);
    }

    graph
}

/// Assign a layout level to every passage.
///
/// The start node occupies level 0, so the starting passage begins at
/// level 1. Levels come from breadth-first depth over choice edges; the
/// traversal never revisits a passage, so cycles and self-loops are
/// harmless. Endings are forced below everything else; passages
/// unreachable from `start` default to level 1.
fn level_passages(story: &Story) -> HashMap<&str, usize> {
    let mut levels: HashMap<&str, usize> = HashMap::new();

    if story.has_passage(&story.start) {
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        queue.push_back((story.start.as_str(), 1));
        while let Some((id, level)) = queue.pop_front() {
            if levels.contains_key(id) {
                continue;
            }
            levels.insert(id, level);
            if let Some(passage) = story.passage(id) {
                for choice in &passage.choices {
                    if story.has_passage(&choice.goto) && !levels.contains_key(choice.goto.as_str())
                    {
                        queue.push_back((choice.goto.as_str(), level + 1));
                    }
                }
            }
        }
    }

    let max_level = story
        .passages
        .iter()
        .filter(|(_, p)| !p.is_ending)
        .filter_map(|(id, _)| levels.get(id.as_str()).copied())
        .max()
        .unwrap_or(0);

    for (id, passage) in &story.passages {
        if passage.is_ending {
            levels.insert(id.as_str(), max_level + 1);
        } else {
            levels.entry(id.as_str()).or_insert(1);
        }
    }

    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use fable_story::{Choice, Passage};

    fn branching_story() -> Story {
        Story::new("fork", "The Fork")
            .with_author("A. Nonymous")
            .with_start("fork")
            .with_initial("lamp", true)
            .with_passage(
                "fork",
                Passage::new("The road splits.")
                    .with_choice(Choice::new("Left", "left").with_set("went", "left"))
                    .with_choice(Choice::new("Right", "right").with_condition("lamp", true)),
            )
            .with_passage(
                "left",
                Passage::new("A quiet path.").with_choice(Choice::new("Onward", "camp")),
            )
            .with_passage(
                "right",
                Passage::new("A dark path.").with_choice(Choice::new("Onward", "camp")),
            )
            .with_passage("camp", Passage::ending("You make camp.", EndingType::Good))
    }

    #[test]
    fn creates_one_node_per_passage_plus_start() {
        let graph = decompile(&branching_story());
        assert_eq!(graph.nodes.len(), 5);
        assert_eq!(graph.start_nodes().len(), 1);

        let endings = graph
            .nodes
            .iter()
            .filter(|n| matches!(n.payload, NodePayload::Ending { .. }))
            .count();
        assert_eq!(endings, 1);
    }

    #[test]
    fn start_node_carries_initial_state_and_edge() {
        let graph = decompile(&branching_story());
        let start = graph.start_nodes()[0];
        let NodePayload::Start { initial_state, .. } = &start.payload else {
            panic!("not a start node");
        };
        assert_eq!(initial_state.len(), 1);
        assert_eq!(initial_state[0].key, "lamp");

        let start_edge = graph.edges_from(&start.id).next().unwrap();
        let target = graph.node(&start_edge.target).unwrap();
        assert_eq!(target.payload.passage_id(), Some("fork"));
    }

    #[test]
    fn choices_become_handled_edges() {
        let story = branching_story();
        let graph = decompile(&story);

        let fork = graph
            .nodes
            .iter()
            .find(|n| n.payload.passage_id() == Some("fork"))
            .unwrap();
        let NodePayload::Passage { choices, .. } = &fork.payload else {
            panic!("not a passage");
        };
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].set_state["went"], "left".into());
        assert_eq!(choices[1].condition["lamp"], true.into());

        for stub in choices {
            assert!(
                graph
                    .edges_from(&fork.id)
                    .any(|e| e.source_handle.as_deref() == Some(stub.handle().as_str())),
                "choice {} should have an edge",
                stub.id
            );
        }
    }

    #[test]
    fn dangling_goto_produces_no_edge() {
        let story = Story::new("broken", "Broken")
            .with_start("a")
            .with_passage(
                "a",
                Passage::new("A.").with_choice(Choice::new("leap", "missing")),
            );
        let graph = decompile(&story);
        let a = graph
            .nodes
            .iter()
            .find(|n| n.payload.passage_id() == Some("a"))
            .unwrap();
        assert_eq!(graph.edges_from(&a.id).count(), 0);
    }

    #[test]
    fn endings_sit_below_all_other_levels() {
        let graph = decompile(&branching_story());
        let max_passage_y = graph
            .nodes
            .iter()
            .filter(|n| matches!(n.payload, NodePayload::Passage { .. }))
            .map(|n| n.position.y)
            .fold(f64::MIN, f64::max);
        let ending = graph
            .nodes
            .iter()
            .find(|n| matches!(n.payload, NodePayload::Ending { .. }))
            .unwrap();
        assert!(ending.position.y > max_passage_y);
    }

    #[test]
    fn same_level_nodes_do_not_overlap() {
        let graph = decompile(&branching_story());
        let (left, right) = (
            graph
                .nodes
                .iter()
                .find(|n| n.payload.passage_id() == Some("left"))
                .unwrap(),
            graph
                .nodes
                .iter()
                .find(|n| n.payload.passage_id() == Some("right"))
                .unwrap(),
        );
        assert_eq!(left.position.y, right.position.y);
        assert_ne!(left.position.x, right.position.x);
    }

    #[test]
    fn leveling_tolerates_cycles_and_self_loops() {
        let story = Story::new("loop", "Loop")
            .with_start("a")
            .with_passage(
                "a",
                Passage::new("A.")
                    .with_choice(Choice::new("again", "a"))
                    .with_choice(Choice::new("on", "b")),
            )
            .with_passage(
                "b",
                Passage::new("B.").with_choice(Choice::new("back", "a")),
            );

        let graph = decompile(&story);
        assert_eq!(graph.nodes.len(), 3);
    }
}
