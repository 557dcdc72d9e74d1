use std::path::{Path, PathBuf};

use fable_builder::{BuilderGraph, compile, validate_graph, validate_story};

pub fn run(draft_path: &Path, output: Option<&Path>) -> Result<(), String> {
    let json = std::fs::read_to_string(draft_path)
        .map_err(|e| format!("cannot read {}: {e}", draft_path.display()))?;
    let graph = BuilderGraph::from_json(&json).map_err(|e| format!("invalid draft JSON: {e}"))?;

    // Export is blocked while the graph has errors; warnings pass.
    let report = validate_graph(&graph);
    super::print_report(&report);
    if !report.is_valid() {
        return Err("draft failed validation; export blocked".into());
    }

    let story = compile(&graph);
    let report = validate_story(&story);
    if !report.is_valid() {
        super::print_report(&report);
        return Err("compiled story failed validation; export blocked".into());
    }

    let path = output.map_or_else(
        || PathBuf::from(format!("{}.adventure.json", story.id)),
        Path::to_path_buf,
    );
    let json = serde_json::to_string_pretty(&story).map_err(|e| e.to_string())?;
    std::fs::write(&path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))?;

    println!(
        "  Exported '{}' ({} passages) to {}.",
        story.title,
        story.passage_count(),
        path.display()
    );
    Ok(())
}
