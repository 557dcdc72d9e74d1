use std::path::Path;

use fable_builder::validate_story;

pub fn run(file: &Path) -> Result<(), String> {
    let story = super::read_story(file)?;
    let report = validate_story(&story);
    super::print_report(&report);

    if report.is_valid() {
        println!(
            "  '{}' is valid: {} passages, {} endings.",
            story.title,
            story.passage_count(),
            story.endings().len()
        );
        Ok(())
    } else {
        Err("story failed validation".into())
    }
}
