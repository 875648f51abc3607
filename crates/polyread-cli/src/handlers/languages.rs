//! Languages command handler.

use polyread_core::{ActiveLanguages, LanguageCode};

use crate::config::CliConfig;
use crate::error::CliError;
use crate::presentation::{language_label, print_separator};

/// Execute the languages command.
///
/// Lists every supported language with its profile size and, for active
/// languages, their priority.
pub fn execute(config: &CliConfig) -> Result<(), CliError> {
    let active = config.active_languages()?;

    println!("{:<4} {:<28} {:>8}  {:<8} Diacritics", "Code", "Language", "Lexicon", "Active");
    print_separator(72);
    for language in LanguageCode::ALL {
        println!("{}", format_row(language, &active));
    }
    Ok(())
}

#[must_use]
pub fn format_row(language: LanguageCode, active: &ActiveLanguages) -> String {
    let profile = language.profile();
    let priority = active
        .iter()
        .position(|code| code == language)
        .map_or_else(|| "-".to_string(), |slot| format!("#{}", slot + 1));
    let diacritics: String = profile.diacritics().iter().collect();
    let diacritics = if diacritics.is_empty() {
        "(none)".to_string()
    } else {
        diacritics
    };
    format!(
        "{:<4} {:<28} {:>8}  {:<8} {diacritics}",
        language.code(),
        language_label(language),
        profile.lexicon().len(),
        priority,
    )
}
