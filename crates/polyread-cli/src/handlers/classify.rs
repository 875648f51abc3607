//! Classify command handler.
//!
//! Prints every token with the language it would be spoken in.

use console::style;
use polyread_core::{ActiveLanguages, AnnotatedToken, analyze};

use crate::config::CliConfig;
use crate::error::CliError;
use crate::presentation::{language_label, print_separator, truncate_string};

/// Execute the classify command.
///
/// # Errors
///
/// Returns an error if the active language list is invalid or JSON output
/// cannot be produced.
pub fn execute(config: &CliConfig, text: &str, json: bool) -> Result<(), CliError> {
    let active = config.active_languages()?;
    let tokens = analyze(text, &active);

    if json {
        let output = serde_json::to_string_pretty(&tokens)
            .map_err(|e| CliError::Io(format!("failed to serialize tokens: {e}")))?;
        println!("{output}");
        return Ok(());
    }

    if tokens.is_empty() {
        println!("No words found.");
        return Ok(());
    }

    println!("{:>4}  {:<24} Language", "#", "Word");
    print_separator(50);
    for token in &tokens {
        println!("{}", format_row(token, &active));
    }
    print_separator(50);

    let secondary = tokens.iter().filter(|t| t.is_secondary(&active)).count();
    println!(
        "{} word(s), {secondary} outside {}",
        tokens.len(),
        language_label(active.primary())
    );
    Ok(())
}

/// One table row: index, word (foreign words styled), language.
#[must_use]
pub fn format_row(token: &AnnotatedToken, active: &ActiveLanguages) -> String {
    let word = truncate_string(token.text(), 24);
    // Pad before styling so escape codes don't count towards the width.
    let padding = " ".repeat(24usize.saturating_sub(word.chars().count()));
    let word = if token.is_secondary(active) {
        style(word).cyan().bold().to_string()
    } else {
        word
    };
    format!(
        "{:>4}  {word}{padding} {}",
        token.index(),
        language_label(token.language)
    )
}
