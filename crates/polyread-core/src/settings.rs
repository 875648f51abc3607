//! Reader settings domain types, validation and loading.
//!
//! Settings arrive from outside the core (a settings file, CLI flags, a
//! settings widget). Writing them back is the caller's concern; this module
//! only reads, merges and validates.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::language::{ActiveLanguages, LanguageCode, LanguageError};
use crate::voice::VoiceSelection;

/// Slowest allowed speech rate multiplier.
pub const MIN_SPEED: f32 = 0.5;

/// Fastest allowed speech rate multiplier.
pub const MAX_SPEED: f32 = 2.0;

/// Rate used when nothing is configured.
pub const DEFAULT_SPEED: f32 = 1.3;

/// Reader settings structure.
///
/// All fields are optional to support partial files and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReaderSettings {
    /// Active languages in priority order. The first is the majority language.
    pub active_languages: Option<Vec<LanguageCode>>,

    /// Explicit voice id per language; missing languages use catalog defaults.
    pub voices: BTreeMap<LanguageCode, String>,

    /// Speech rate multiplier (0.5–2.0).
    pub speed: Option<f32>,
}

impl ReaderSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            active_languages: Some(vec![LanguageCode::Pt, LanguageCode::Fr]),
            voices: BTreeMap::new(),
            speed: Some(DEFAULT_SPEED),
        }
    }

    /// Get the effective speed (with default fallback).
    #[must_use]
    pub fn effective_speed(&self) -> f32 {
        self.speed.unwrap_or(DEFAULT_SPEED)
    }

    /// Get the effective active languages (with default fallback).
    pub fn effective_active_languages(&self) -> Result<ActiveLanguages, SettingsError> {
        match &self.active_languages {
            Some(codes) => Ok(ActiveLanguages::new(codes.iter().copied())?),
            None => Ok(ActiveLanguages::default()),
        }
    }

    /// Explicit voice choices as a [`VoiceSelection`].
    #[must_use]
    pub fn voice_selection(&self) -> VoiceSelection {
        self.voices
            .iter()
            .map(|(code, id)| (*code, id.clone()))
            .collect()
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref languages) = other.active_languages {
            self.active_languages.clone_from(languages);
        }
        if let Some(ref voices) = other.voices {
            for (code, voice) in voices {
                match voice {
                    Some(id) => {
                        self.voices.insert(*code, id.clone());
                    }
                    None => {
                        self.voices.remove(code);
                    }
                }
            }
        }
        if let Some(speed) = other.speed {
            self.speed = speed;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
///
/// Voices are merged per language: `Some(None)` clears one language.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub active_languages: Option<Option<Vec<LanguageCode>>>,
    pub voices: Option<BTreeMap<LanguageCode, Option<String>>>,
    pub speed: Option<Option<f32>>,
}

/// Settings validation and loading error.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Speed must be between 0.5 and 2.0, got {0}")]
    InvalidSpeed(f32),

    #[error("Invalid active languages: {0}")]
    Languages(#[from] LanguageError),

    #[error("Voice id for '{0}' cannot be empty")]
    EmptyVoiceId(LanguageCode),

    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Validate settings values.
pub fn validate_settings(settings: &ReaderSettings) -> Result<(), SettingsError> {
    // Validate speed (NaN fails the range check too)
    if let Some(speed) = settings.speed {
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(SettingsError::InvalidSpeed(speed));
        }
    }

    // Validate active languages
    settings.effective_active_languages()?;

    // Validate voice ids
    if let Some((code, _)) = settings.voices.iter().find(|(_, id)| id.trim().is_empty()) {
        return Err(SettingsError::EmptyVoiceId(*code));
    }

    Ok(())
}

/// Clamp a requested speed into the allowed range.
///
/// Non-finite input falls back to [`DEFAULT_SPEED`].
#[must_use]
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_finite() {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    } else {
        DEFAULT_SPEED
    }
}

/// Load and validate settings from a JSON file.
pub fn load_settings(path: &Path) -> Result<ReaderSettings, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: ReaderSettings =
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate_settings(&settings)?;
    tracing::debug!(path = %path.display(), "Loaded reader settings");
    Ok(settings)
}

/// Load settings from `path` if it exists, otherwise return defaults.
pub fn load_settings_or_default(path: &Path) -> Result<ReaderSettings, SettingsError> {
    if path.exists() {
        load_settings(path)
    } else {
        tracing::debug!(path = %path.display(), "No settings file, using defaults");
        Ok(ReaderSettings::with_defaults())
    }
}
