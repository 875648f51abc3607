//! Silent engine that paces words as if they were spoken.
//!
//! Used by the CLI and in environments without a system synthesizer: each
//! request takes roughly as long as the word would take to say at the
//! requested rate, and [`cancel_all`](SpeechEngine::cancel_all) cuts any
//! in-flight word short.

use std::time::Duration;

use tokio::sync::watch;

use polyread_core::{LanguageCode, Voice};

use crate::engine::{SpeechEngine, SpeechRequest};
use crate::error::VoiceError;

/// Time per character at rate 1.0.
pub const DEFAULT_CHAR_DURATION: Duration = Duration::from_millis(70);

/// Floor applied to every word.
pub const MIN_WORD_DURATION: Duration = Duration::from_millis(120);

/// Speech engine that only waits.
#[derive(Debug)]
pub struct ConsoleSpeechEngine {
    char_duration: Duration,
    cancel_tx: watch::Sender<u64>,
}

impl ConsoleSpeechEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_char_duration(DEFAULT_CHAR_DURATION)
    }

    /// Engine with a custom per-character pace.
    #[must_use]
    pub fn with_char_duration(char_duration: Duration) -> Self {
        let (cancel_tx, _rx) = watch::channel(0);
        Self {
            char_duration,
            cancel_tx,
        }
    }

    /// How long `request` takes to "speak".
    #[must_use]
    pub fn duration_for(&self, request: &SpeechRequest) -> Duration {
        let chars = u32::try_from(request.text.chars().count()).unwrap_or(u32::MAX);
        let rate = if request.rate.is_finite() && request.rate > 0.0 {
            request.rate
        } else {
            1.0
        };
        let spoken = self.char_duration.saturating_mul(chars).div_f32(rate);
        spoken.max(MIN_WORD_DURATION.div_f32(rate))
    }

    /// One console voice per supported language.
    #[must_use]
    pub fn voices() -> Vec<Voice> {
        LanguageCode::ALL
            .iter()
            .map(|code| Voice::new(format!("console-{code}"), code.code(), "Console"))
            .collect()
    }
}

impl Default for ConsoleSpeechEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SpeechEngine for ConsoleSpeechEngine {
    async fn speak(&self, request: &SpeechRequest) -> Result<(), VoiceError> {
        let mut cancelled = self.cancel_tx.subscribe();
        let duration = self.duration_for(request);
        tracing::trace!(word = %request.text, ?duration, "Console speak");

        tokio::select! {
            () = tokio::time::sleep(duration) => Ok(()),
            _ = cancelled.changed() => Err(VoiceError::Cancelled),
        }
    }

    fn cancel_all(&self) {
        self.cancel_tx.send_modify(|epoch| *epoch = epoch.wrapping_add(1));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use polyread_core::VoiceHandle;

    use super::*;

    fn request(text: &str, rate: f32) -> SpeechRequest {
        SpeechRequest::new(
            text,
            VoiceHandle {
                id: "console-fr".to_string(),
                language: LanguageCode::Fr,
                display_name: "🇫🇷 Console".to_string(),
            },
            rate,
        )
    }

    #[test]
    fn longer_words_take_longer() {
        let engine = ConsoleSpeechEngine::new();
        let long = engine.duration_for(&request("Petite-fille", 1.0));
        let short = engine.duration_for(&request("Père", 1.0));
        assert!(long > short);
    }

    #[test]
    fn faster_rate_shortens_words() {
        let engine = ConsoleSpeechEngine::new();
        let slow = engine.duration_for(&request("Grand-père", 0.5));
        let fast = engine.duration_for(&request("Grand-père", 2.0));
        assert!(slow.abs_diff(fast * 4) < Duration::from_millis(1));
    }

    #[test]
    fn short_words_have_a_floor() {
        let engine = ConsoleSpeechEngine::new();
        let floor = engine.duration_for(&request("a", 1.0));
        assert!(floor.abs_diff(MIN_WORD_DURATION) < Duration::from_millis(1));
    }

    #[test]
    fn voices_cover_every_language() {
        let voices = ConsoleSpeechEngine::voices();
        assert_eq!(voices.len(), LanguageCode::ALL.len());
        assert_eq!(voices[0].id, "console-pt");
        assert!(voices.iter().all(|voice| voice.language().is_some()));
    }

    #[test]
    fn speak_finishes() {
        let engine = ConsoleSpeechEngine::with_char_duration(Duration::from_millis(1));
        let result = tokio_test::block_on(async {
            tokio::time::timeout(Duration::from_secs(5), engine.speak(&request("oui", 2.0))).await
        });
        assert!(matches!(result, Ok(Ok(()))));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_interrupts_speech() {
        let engine = Arc::new(ConsoleSpeechEngine::with_char_duration(Duration::from_secs(60)));
        let speaking = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.speak(&request("Bonjour", 1.0)).await })
        };
        tokio::task::yield_now().await;

        engine.cancel_all();
        assert_eq!(speaking.await.unwrap(), Err(VoiceError::Cancelled));
    }
}
