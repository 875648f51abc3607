//! Voices command handler.
//!
//! Shows the voice catalog and which voice each active language would use.

use polyread_core::{LanguageCode, VoiceSelection};

use crate::config::CliConfig;
use crate::error::CliError;
use crate::presentation::{language_label, print_separator, truncate_string};

/// Execute the voices command.
pub fn execute(config: &CliConfig, language: Option<LanguageCode>) -> Result<(), CliError> {
    let active = config.active_languages()?;
    let selection = VoiceSelection::with_defaults(
        &active,
        &config.directory,
        &config.settings.voice_selection(),
    );

    let voices: Vec<_> = config
        .directory
        .snapshot()
        .iter()
        .filter(|voice| language.is_none_or(|code| voice.language() == Some(code)))
        .cloned()
        .collect();

    if voices.is_empty() {
        println!("No voices available.");
        return Ok(());
    }

    println!("{:<24} {:<8} {:<28} Default", "ID", "Tag", "Name");
    print_separator(70);
    for voice in &voices {
        let is_default = voice
            .language()
            .is_some_and(|code| selection.get(code) == Some(voice.id.as_str()));
        println!(
            "{:<24} {:<8} {:<28} {}",
            truncate_string(&voice.id, 23),
            truncate_string(&voice.language_tag, 7),
            truncate_string(&voice.display_name, 27),
            if is_default { "*" } else { "" }
        );
    }

    println!();
    for code in active.iter() {
        match selection.get(code) {
            Some(voice_id) => println!("{}: {voice_id}", language_label(code)),
            None => println!("{}: no voice, words will be skipped", language_label(code)),
        }
    }
    Ok(())
}
