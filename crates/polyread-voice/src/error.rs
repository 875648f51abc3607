//! Playback error types.

use polyread_core::LanguageCode;

/// Errors that can occur while speaking or driving playback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceError {
    /// The speech engine failed to synthesize a request.
    #[error("Speech synthesis failed: {0}")]
    SynthesisError(String),

    /// The engine is not able to accept requests.
    #[error("Speech engine unavailable: {0}")]
    EngineUnavailable(String),

    /// A voice id is not in the catalog for the given language.
    #[error("Voice '{voice_id}' is not available for {language}")]
    UnknownVoice {
        language: LanguageCode,
        voice_id: String,
    },

    /// The playback driver task has shut down.
    #[error("Playback driver is no longer running")]
    DriverStopped,

    /// The request was cancelled before it finished.
    #[error("Speech cancelled")]
    Cancelled,
}
