//! CLI configuration: settings file, flag overrides and the voice catalog.
//!
//! This is the composition root for everything a command needs before it
//! can run. Flags always win over the settings file.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use polyread_core::{
    ActiveLanguages, LanguageCode, ReaderSettings, SettingsUpdate, Voice, VoiceDirectory,
    default_settings_path, load_settings, load_settings_or_default, validate_settings,
};
use polyread_voice::ConsoleSpeechEngine;

use crate::error::CliError;

// ── Voice overrides ────────────────────────────────────────────────

/// `LANG=VOICE_ID` from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceOverride {
    pub language: LanguageCode,
    pub voice_id: String,
}

impl FromStr for VoiceOverride {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (language, voice_id) = s
            .split_once('=')
            .ok_or_else(|| CliError::Arguments(format!("expected LANG=VOICE_ID, got '{s}'")))?;
        let voice_id = voice_id.trim();
        if voice_id.is_empty() {
            return Err(CliError::Arguments(format!("missing voice id in '{s}'")));
        }
        Ok(Self {
            language: language.trim().parse()?,
            voice_id: voice_id.to_string(),
        })
    }
}

/// Flag values that override the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub languages: Vec<LanguageCode>,
    pub speed: Option<f32>,
    pub voices: Vec<VoiceOverride>,
}

impl Overrides {
    /// As a partial settings update. Empty flags leave the file values alone.
    #[must_use]
    pub fn to_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            active_languages: (!self.languages.is_empty()).then(|| Some(self.languages.clone())),
            voices: (!self.voices.is_empty()).then(|| {
                self.voices
                    .iter()
                    .map(|v| (v.language, Some(v.voice_id.clone())))
                    .collect()
            }),
            speed: self.speed.map(Some),
        }
    }
}

// ── Config ─────────────────────────────────────────────────────────

/// Everything a command needs: effective settings and the voice catalog.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub settings: ReaderSettings,
    pub directory: VoiceDirectory,
}

impl CliConfig {
    /// Load settings and voices.
    ///
    /// An explicit `config` path must exist. The default path may be absent,
    /// in which case defaults are used.
    pub fn load(config: Option<&Path>, voices: Option<&Path>) -> Result<Self, CliError> {
        let settings = match config {
            Some(path) => load_settings(path)?,
            None => load_settings_or_default(&default_settings_path()?)?,
        };
        let directory = VoiceDirectory::new(match voices {
            Some(path) => load_voices(path)?,
            None => ConsoleSpeechEngine::voices(),
        });
        tracing::debug!(voices = directory.snapshot().len(), "Configuration loaded");
        Ok(Self {
            settings,
            directory,
        })
    }

    /// Apply flag overrides and re-validate.
    pub fn apply(&mut self, overrides: &Overrides) -> Result<(), CliError> {
        self.settings.merge(&overrides.to_update());
        validate_settings(&self.settings)?;
        Ok(())
    }

    pub fn active_languages(&self) -> Result<ActiveLanguages, CliError> {
        Ok(self.settings.effective_active_languages()?)
    }
}

/// Read a JSON array of voices.
pub fn load_voices(path: &Path) -> Result<Vec<Voice>, CliError> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    let voices: Vec<Voice> = serde_json::from_str(&content)
        .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
    Ok(voices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_override_parsing() {
        let parsed: VoiceOverride = "fr=thomas".parse().unwrap();
        assert_eq!(parsed.language, LanguageCode::Fr);
        assert_eq!(parsed.voice_id, "thomas");

        let tagged: VoiceOverride = "pt-BR = luciana".parse().unwrap();
        assert_eq!(tagged.language, LanguageCode::Pt);

        assert!("thomas".parse::<VoiceOverride>().is_err());
        assert!("fr=".parse::<VoiceOverride>().is_err());
        assert!("xx=thomas".parse::<VoiceOverride>().is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "active_languages": ["it", "de"], "speed": 0.8 }"#).unwrap();

        let mut config = CliConfig::load(Some(&path), None).unwrap();
        config
            .apply(&Overrides {
                languages: vec![LanguageCode::Pt, LanguageCode::Fr],
                speed: None,
                voices: vec!["fr=console-fr".parse().unwrap()],
            })
            .unwrap();

        assert_eq!(
            config.active_languages().unwrap().as_slice(),
            [LanguageCode::Pt, LanguageCode::Fr]
        );
        assert_eq!(config.settings.speed, Some(0.8));
        assert_eq!(
            config.settings.voices.get(&LanguageCode::Fr).map(String::as_str),
            Some("console-fr")
        );
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{}").unwrap();

        let mut config = CliConfig::load(Some(&path), None).unwrap();
        let result = config.apply(&Overrides {
            speed: Some(4.0),
            ..Overrides::default()
        });
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = CliConfig::load(Some(&dir.path().join("absent.json")), None);
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn test_voice_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        fs::write(&settings, "{}").unwrap();
        let voices = dir.path().join("voices.json");
        fs::write(
            &voices,
            r#"[
                { "id": "thomas", "languageTag": "fr-FR", "displayName": "Thomas" },
                { "id": "kyoko", "languageTag": "ja-JP", "displayName": "Kyoko" }
            ]"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(&settings), Some(&voices)).unwrap();
        let catalog = config.directory.snapshot();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].id, "thomas");
    }

    #[test]
    fn test_default_catalog_is_console_voices() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        fs::write(&settings, "{}").unwrap();

        let config = CliConfig::load(Some(&settings), None).unwrap();
        assert_eq!(config.directory.snapshot().len(), LanguageCode::ALL.len());
    }
}
