//! Read command handler.
//!
//! Plays the text through the console engine and prints each word as it is
//! highlighted. Ctrl-C stops playback cleanly.

use std::sync::Arc;

use polyread_core::{ActiveLanguages, AnnotatedToken, PlaybackEvent, PlaybackStatus};
use polyread_voice::{ConsoleSpeechEngine, NowReading, PacingConfig, ReaderService};

use crate::config::CliConfig;
use crate::error::CliError;
use crate::presentation::styled_word;

/// Execute the read command.
///
/// # Errors
///
/// Returns an error if the settings are invalid or the playback driver
/// stops unexpectedly.
pub async fn execute(config: &CliConfig, text: String) -> Result<(), CliError> {
    let (service, mut events) = ReaderService::new(
        &config.settings,
        config.directory.clone(),
        Arc::new(ConsoleSpeechEngine::new()),
        PacingConfig::default(),
    )?;

    service.set_text(text);
    let tokens = service.tokens();
    if tokens.is_empty() {
        println!("Nothing to read.");
        service.shutdown().await;
        return Ok(());
    }
    let active = service.active_languages();
    tracing::info!(
        words = tokens.len(),
        speed = service.speed(),
        languages = ?active.as_slice(),
        "Reading"
    );

    service.toggle()?;

    let mut started = false;
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    PlaybackEvent::Highlight { index } => {
                        if let Some(token) = tokens.get(index) {
                            println!("{}", caption_line(token, tokens.len(), &active));
                        }
                    }
                    PlaybackEvent::Status { status: PlaybackStatus::Playing } => started = true,
                    PlaybackEvent::Status { status: PlaybackStatus::Idle } if started => break,
                    PlaybackEvent::Status { .. } | PlaybackEvent::Progress { .. } => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("Stopped.");
                service.stop()?;
            }
        }
    }

    service.shutdown().await;
    Ok(())
}

/// `Reading word 3 of 10: "Père" (🇫🇷 Francês)` with the word styled.
#[must_use]
pub fn caption_line(token: &AnnotatedToken, total: usize, active: &ActiveLanguages) -> String {
    let caption = NowReading {
        position: token.index() + 1,
        total,
        word: token.text().to_string(),
        language: token.language,
    };
    let plain = caption.to_string();
    let quoted = format!("\"{}\"", token.text());
    plain.replacen(&quoted, &format!("\"{}\"", styled_word(token, active)), 1)
}
