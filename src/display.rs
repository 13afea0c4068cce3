use crate::parser::FileSuggestion;
use crate::workspace::guard::format_bytes;
use console::style;
use std::io;

pub enum UserChoice {
    Accept,
    Decline,
}

/// Display an assistant reply, rendering markdown when it looks like the
/// reply contains any.
pub fn display_reply(text: &str) {
    println!("\n{}", style("Assistant").bold().blue());
    if text.contains("```") || text.contains('*') || text.contains('`') || text.contains('#') {
        termimad::print_text(text);
    } else {
        println!("{text}");
    }
    println!();
}

/// Display informational output (command results, status notes).
pub fn display_info(text: &str) {
    println!("{text}");
}

pub fn display_error(err: &impl std::fmt::Display) {
    eprintln!("{} {}", style("Error:").bold().red(), err);
}

/// Ask the user whether a model-proposed file write should go ahead.
pub fn prompt_suggestion_confirmation(suggestion: &FileSuggestion) -> UserChoice {
    println!(
        "\n{} {}",
        style("✏️").bold(),
        style(format!(
            "The model proposes creating/overwriting: {}",
            suggestion.path
        ))
        .bold()
        .yellow()
    );
    println!(
        "{}",
        style(format!(
            "({}) Write this file? [y/N]",
            format_bytes(suggestion.content.len() as u64)
        ))
        .cyan()
    );

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return UserChoice::Decline;
    }

    if input.trim().eq_ignore_ascii_case("y") {
        UserChoice::Accept
    } else {
        UserChoice::Decline
    }
}

pub fn display_file_written(path: &str) {
    println!(
        "{} {}",
        style("✅").bold().green(),
        style(format!("Created file: {path}")).green()
    );
}

pub fn display_file_skipped(path: &str) {
    println!(
        "{} {}",
        style("🚫").bold(),
        style(format!("Skipped file: {path}")).dim()
    );
}
