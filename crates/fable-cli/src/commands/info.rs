use std::path::Path;

use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use fable_builder::validate_story;

pub fn run(file: &Path) -> Result<(), String> {
    let story = super::read_story(file)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.add_row(vec!["Id", &story.id]);
    table.add_row(vec!["Title", &story.title]);
    table.add_row(vec!["Author", &story.author]);
    if !story.description.is_empty() {
        table.add_row(vec!["Description", &story.description]);
    }
    table.add_row(vec!["Version", &story.version]);
    table.add_row(vec!["Start", &story.start]);
    table.add_row(vec!["Passages", &story.passage_count().to_string()]);
    table.add_row(vec!["Endings", &story.endings().join(", ")]);
    if !story.initial_state.is_empty() {
        let vars: Vec<String> = story
            .initial_state
            .iter()
            .map(|(k, v)| format!("{k} = {v}"))
            .collect();
        table.add_row(vec!["State", &vars.join(", ")]);
    }
    println!("{table}");

    let report = validate_story(&story);
    if report.is_valid() && report.warnings.is_empty() {
        println!("  No validation issues.");
    } else {
        super::print_report(&report);
    }

    Ok(())
}
