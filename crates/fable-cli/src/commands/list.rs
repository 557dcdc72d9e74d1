use std::path::Path;

use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use fable_story::load_manifest;

pub fn run(manifest_path: &Path) -> Result<(), String> {
    let json = std::fs::read_to_string(manifest_path)
        .map_err(|e| format!("cannot read {}: {e}", manifest_path.display()))?;
    let manifest = load_manifest(&json).map_err(|e| e.to_string())?;

    if manifest.stories.is_empty() {
        println!("The library is empty.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Id", "Title", "Author", "Description", "File"]);
    for entry in &manifest.stories {
        table.add_row(vec![
            &entry.id,
            &entry.title,
            &entry.author,
            &entry.description,
            &entry.file,
        ]);
    }
    println!("{table}");
    println!(
        "  {} stor{}.",
        manifest.stories.len(),
        if manifest.stories.len() == 1 { "y" } else { "ies" },
    );

    Ok(())
}
