//! Speech engine port.
//!
//! The engine is external: a platform synthesizer, a neural TTS backend, or
//! the [`ConsoleSpeechEngine`](crate::console::ConsoleSpeechEngine) used by
//! the CLI. The scheduler submits one [`SpeechRequest`] per token and never
//! submits the next before the previous one resolves.

use serde::{Deserialize, Serialize};

use polyread_core::VoiceHandle;

use crate::error::VoiceError;

/// Pitch multiplier sent with every request.
pub const NEUTRAL_PITCH: f32 = 1.0;

/// Volume sent with every request.
pub const FULL_VOLUME: f32 = 1.0;

/// One word to speak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    /// Text of a single token.
    pub text: String,
    /// Resolved voice for the token's language.
    pub voice: VoiceHandle,
    /// Rate multiplier (0.5–2.0).
    pub rate: f32,
    /// Pitch multiplier, always neutral.
    pub pitch: f32,
    /// Volume (0.0–1.0), always full.
    pub volume: f32,
}

impl SpeechRequest {
    /// Build a request with neutral pitch and full volume.
    pub fn new(text: impl Into<String>, voice: VoiceHandle, rate: f32) -> Self {
        Self {
            text: text.into(),
            voice,
            rate,
            pitch: NEUTRAL_PITCH,
            volume: FULL_VOLUME,
        }
    }
}

/// Backend-agnostic speech engine.
///
/// Implementations must be `Send + Sync` so the driver can share them with
/// the task awaiting each request.
#[async_trait::async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Speak `request`, resolving once when the audio has finished or failed.
    ///
    /// After [`cancel_all`](Self::cancel_all) an in-flight call may resolve
    /// with [`VoiceError::Cancelled`] or not at all; callers must not rely on
    /// either.
    async fn speak(&self, request: &SpeechRequest) -> Result<(), VoiceError>;

    /// Stop any in-flight audio immediately.
    fn cancel_all(&self);
}
