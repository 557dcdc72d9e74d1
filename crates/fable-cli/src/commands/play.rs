use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use fable_builder::validate_story;
use fable_play::Session;
use fable_story::EndingType;

pub fn run(file: &Path) -> Result<(), String> {
    let story = super::read_story(file)?;

    // Readers refuse documents with validation errors.
    let report = validate_story(&story);
    if !report.is_valid() {
        super::print_report(&report);
        return Err("unable to load story; run `fable check` for details".into());
    }

    let mut session = Session::load(story).map_err(|e| e.to_string())?;

    println!("{}", session.story().title.bold());
    println!("by {}\n", session.story().author);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        render(&session);

        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| e.to_string())?;

        match line.trim() {
            "q" | "quit" => break,
            "b" | "back" => session.go_back(),
            "r" | "restart" => session.restart(),
            "" => {}
            input => match input.parse::<usize>() {
                Ok(n) if n >= 1 && session.choose(n - 1).is_ok() => {}
                _ => println!("Enter a choice number, or b (back), r (restart), q (quit)."),
            },
        }
    }

    Ok(())
}

fn render(session: &Session) {
    let Some(passage) = session.current_passage() else {
        // Broken link in a mid-edit story: recoverable, not fatal.
        println!(
            "{}",
            format!(
                "Unable to find passage \"{}\".",
                session.current_passage_id()
            )
            .red()
        );
        if session.can_go_back() {
            println!("Type b to go back.");
        }
        return;
    };

    println!();
    for paragraph in passage.paragraphs() {
        println!("{paragraph}\n");
    }

    if session.is_ending() {
        let banner = match session.ending_type() {
            Some(EndingType::Good) => "Good Ending",
            Some(EndingType::Bad) => "Bad Ending",
            Some(EndingType::Neutral) | None => "The End",
        };
        println!("{}", format!("*** {banner} ***").bold());
        println!("r to restart, q to quit");
        return;
    }

    let choices = session.available_choices();
    if choices.is_empty() {
        println!("This passage has no available choices.");
        if session.can_go_back() {
            println!("Type b to go back.");
        }
        return;
    }
    for (index, choice) in choices.iter().enumerate() {
        println!("  [{}] {}", index + 1, choice.text);
    }
}
