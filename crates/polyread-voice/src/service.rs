//! `ReaderService`: text, languages, voices and playback behind one facade.
//!
//! The service keeps the editable reading state (text, active languages,
//! voice choices, speed) and re-annotates the text whenever the text or the
//! language list changes. Starting playback hands the *current* annotation
//! and voice selection to the driver, which freezes them for that run.
//!
//! # Locking discipline
//!
//! Reading state sits behind a `std::sync::RwLock` that is never held across
//! an `.await`. Playback state lives only in the driver task and is queried
//! through [`PlaybackHandle::snapshot`].

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use polyread_core::{
    ActiveLanguages, AnnotatedToken, LanguageCode, LanguageError, PlaybackEvent, ReaderSettings,
    SettingsError, VoiceCatalog, VoiceDirectory, VoiceSelection, analyze, clamp_speed,
};

use crate::driver::{PlaybackDriver, PlaybackHandle};
use crate::engine::SpeechEngine;
use crate::error::VoiceError;
use crate::scheduler::{PacingConfig, PlaybackScheduler, PlaybackSnapshot};

// ── Now reading ────────────────────────────────────────────────────

/// Caption for the word currently being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowReading {
    /// 1-based position in the run.
    pub position: usize,
    pub total: usize,
    pub word: String,
    pub language: LanguageCode,
}

impl NowReading {
    fn from_snapshot(snapshot: PlaybackSnapshot) -> Option<Self> {
        let token = snapshot.current?;
        Some(Self {
            position: token.index() + 1,
            total: snapshot.total,
            word: token.token.text,
            language: token.language,
        })
    }
}

impl fmt::Display for NowReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reading word {} of {}: \"{}\" ({} {})",
            self.position,
            self.total,
            self.word,
            self.language.flag(),
            self.language.display_name()
        )
    }
}

// ── Service ────────────────────────────────────────────────────────

struct ReaderState {
    text: String,
    active: ActiveLanguages,
    tokens: Arc<[AnnotatedToken]>,
    selection: VoiceSelection,
    speed: f32,
}

impl ReaderState {
    fn reannotate(&mut self) {
        self.tokens = analyze(&self.text, &self.active).into();
    }

    fn refresh_selection(&mut self, catalog: &dyn VoiceCatalog) {
        self.selection = VoiceSelection::with_defaults(&self.active, catalog, &self.selection);
    }
}

/// Reading session: editable state plus a playback driver.
pub struct ReaderService {
    state: RwLock<ReaderState>,
    directory: VoiceDirectory,
    playback: PlaybackHandle,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl ReaderService {
    /// Build a service from settings and spawn its playback driver.
    ///
    /// Must be called inside a tokio runtime. Returns the service and the
    /// receiver for playback events.
    pub fn new(
        settings: &ReaderSettings,
        directory: VoiceDirectory,
        engine: Arc<dyn SpeechEngine>,
        pacing: PacingConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<PlaybackEvent>), SettingsError> {
        let active = settings.effective_active_languages()?;
        let selection =
            VoiceSelection::with_defaults(&active, &directory, &settings.voice_selection());

        let (scheduler, events) = PlaybackScheduler::new(Arc::new(directory.clone()), pacing);
        let (playback, driver) = PlaybackDriver::spawn(scheduler, engine);

        let state = ReaderState {
            text: String::new(),
            active,
            tokens: Arc::from([]),
            selection,
            speed: clamp_speed(settings.effective_speed()),
        };

        let service = Self {
            state: RwLock::new(state),
            directory,
            playback,
            driver: Mutex::new(Some(driver)),
        };
        Ok((service, events))
    }

    // ── Text ───────────────────────────────────────────────────────

    #[must_use]
    pub fn text(&self) -> String {
        self.read().text.clone()
    }

    /// Replace the text and re-annotate it. A run in progress keeps reading
    /// the text it started with.
    pub fn set_text(&self, text: impl Into<String>) {
        let mut state = self.write();
        state.text = text.into();
        state.reannotate();
        tracing::debug!(tokens = state.tokens.len(), "Text updated");
    }

    /// Current annotation of the text.
    #[must_use]
    pub fn tokens(&self) -> Arc<[AnnotatedToken]> {
        Arc::clone(&self.read().tokens)
    }

    // ── Languages ──────────────────────────────────────────────────

    #[must_use]
    pub fn active_languages(&self) -> ActiveLanguages {
        self.read().active.clone()
    }

    /// Replace the whole active list.
    pub fn set_active_languages(&self, active: ActiveLanguages) {
        let mut state = self.write();
        state.active = active;
        state.reannotate();
        state.refresh_selection(&self.directory);
        tracing::info!(languages = ?state.active.as_slice(), "Active languages changed");
    }

    /// Put `code` into `slot` of the active list.
    pub fn set_language(&self, slot: usize, code: LanguageCode) -> Result<(), LanguageError> {
        let mut state = self.write();
        state.active.replace(slot, code)?;
        state.reannotate();
        state.refresh_selection(&self.directory);
        tracing::info!(slot, %code, "Active language replaced");
        Ok(())
    }

    // ── Voices ─────────────────────────────────────────────────────

    #[must_use]
    pub fn voice_selection(&self) -> VoiceSelection {
        self.read().selection.clone()
    }

    /// Choose the voice for `language`. The voice must be in the catalog.
    pub fn select_voice(&self, language: LanguageCode, voice_id: &str) -> Result<(), VoiceError> {
        if self.directory.resolve(language, voice_id).is_none() {
            return Err(VoiceError::UnknownVoice {
                language,
                voice_id: voice_id.to_string(),
            });
        }
        self.write().selection.set(language, voice_id);
        tracing::debug!(%language, voice_id, "Voice selected");
        Ok(())
    }

    /// Recompute default voices against the current catalog.
    pub fn refresh_voices(&self) {
        let mut state = self.write();
        state.refresh_selection(&self.directory);
        tracing::debug!(selected = state.selection.len(), "Voice defaults recomputed");
    }

    /// Recompute default voices every time the catalog changes.
    ///
    /// The task holds only a weak reference and exits once the service is
    /// gone.
    #[must_use]
    pub fn watch_catalog(self: &Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.directory.subscribe();
        let service: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let Some(service) = service.upgrade() else {
                    break;
                };
                service.refresh_voices();
            }
        })
    }

    #[must_use]
    pub const fn directory(&self) -> &VoiceDirectory {
        &self.directory
    }

    // ── Speed ──────────────────────────────────────────────────────

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.read().speed
    }

    /// Set the rate for the next run, clamped to the allowed range.
    pub fn set_speed(&self, speed: f32) -> f32 {
        let speed = clamp_speed(speed);
        self.write().speed = speed;
        speed
    }

    /// Current reading state as settings, e.g. for persisting.
    #[must_use]
    pub fn settings(&self) -> ReaderSettings {
        let state = self.read();
        ReaderSettings {
            active_languages: Some(state.active.as_slice().to_vec()),
            voices: state
                .selection
                .iter()
                .map(|(code, id)| (code, id.to_string()))
                .collect(),
            speed: Some(state.speed),
        }
    }

    // ── Playback ───────────────────────────────────────────────────

    /// Play the current text, or stop if already playing.
    pub fn toggle(&self) -> Result<(), VoiceError> {
        let (tokens, selection, speed) = {
            let state = self.read();
            (Arc::clone(&state.tokens), state.selection.clone(), state.speed)
        };
        self.playback.start(tokens, selection, speed)
    }

    pub fn stop(&self) -> Result<(), VoiceError> {
        self.playback.stop()
    }

    pub async fn snapshot(&self) -> Result<PlaybackSnapshot, VoiceError> {
        self.playback.snapshot().await
    }

    /// Caption for the word being read, `None` while idle.
    pub async fn now_reading(&self) -> Result<Option<NowReading>, VoiceError> {
        Ok(NowReading::from_snapshot(self.snapshot().await?))
    }

    #[must_use]
    pub const fn playback(&self) -> &PlaybackHandle {
        &self.playback
    }

    /// Stop playback and wait for the driver task to exit.
    pub async fn shutdown(&self) {
        if self.playback.shutdown().is_err() {
            tracing::debug!("Playback driver already stopped");
        }
        let driver = self
            .driver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(driver) = driver {
            if let Err(e) = driver.await {
                tracing::warn!(error = %e, "Playback driver task failed");
            }
        }
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn read(&self) -> RwLockReadGuard<'_, ReaderState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ReaderState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ReaderService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("ReaderService")
            .field("tokens", &state.tokens.len())
            .field("active", &state.active)
            .field("speed", &state.speed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use polyread_core::{PlaybackStatus, Voice};

    use super::*;
    use crate::console::ConsoleSpeechEngine;

    fn directory() -> VoiceDirectory {
        VoiceDirectory::new(vec![
            Voice::new("luciana", "pt-BR", "Luciana"),
            Voice::new("thomas", "fr-FR", "Thomas"),
            Voice::new("amelie", "fr-CA", "Amélie"),
        ])
    }

    fn service() -> ReaderService {
        let (service, _events) = ReaderService::new(
            &ReaderSettings::with_defaults(),
            directory(),
            Arc::new(ConsoleSpeechEngine::new()),
            PacingConfig::immediate(),
        )
        .unwrap();
        service
    }

    #[test]
    fn now_reading_caption() {
        let caption = NowReading {
            position: 3,
            total: 10,
            word: "Père".to_string(),
            language: LanguageCode::Fr,
        };
        assert_eq!(
            caption.to_string(),
            "Reading word 3 of 10: \"Père\" (🇫🇷 Francês)"
        );
    }

    #[tokio::test]
    async fn defaults_come_from_catalog() {
        let service = service();
        let selection = service.voice_selection();
        assert_eq!(selection.get(LanguageCode::Pt), Some("luciana"));
        assert_eq!(selection.get(LanguageCode::Fr), Some("thomas"));
    }

    #[tokio::test]
    async fn text_and_language_changes_reannotate() {
        let service = service();
        service.set_text("Pai: Père");
        assert_eq!(service.tokens()[1].language, LanguageCode::Fr);

        service.set_language(1, LanguageCode::It).unwrap();
        assert_eq!(
            service.active_languages().as_slice(),
            [LanguageCode::Pt, LanguageCode::It]
        );
        assert_eq!(service.tokens()[1].language, LanguageCode::It);
        assert_eq!(service.voice_selection().get(LanguageCode::Fr), None);

        assert!(matches!(
            service.set_language(1, LanguageCode::Pt),
            Err(LanguageError::DuplicateLanguage(LanguageCode::Pt))
        ));
    }

    #[tokio::test]
    async fn select_voice_checks_catalog() {
        let service = service();
        service.select_voice(LanguageCode::Fr, "amelie").unwrap();
        assert_eq!(service.voice_selection().get(LanguageCode::Fr), Some("amelie"));

        assert_eq!(
            service.select_voice(LanguageCode::Pt, "amelie"),
            Err(VoiceError::UnknownVoice {
                language: LanguageCode::Pt,
                voice_id: "amelie".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn speed_is_clamped() {
        let service = service();
        assert!((service.set_speed(5.0) - 2.0).abs() < f32::EPSILON);
        assert!((service.set_speed(0.1) - 0.5).abs() < f32::EPSILON);
        assert!((service.speed() - 0.5).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn settings_reflect_current_state() {
        let service = service();
        service.set_speed(1.0);
        let settings = service.settings();
        assert_eq!(
            settings.active_languages,
            Some(vec![LanguageCode::Pt, LanguageCode::Fr])
        );
        assert_eq!(settings.voices.get(&LanguageCode::Fr).map(String::as_str), Some("thomas"));
        assert_eq!(settings.speed, Some(1.0));
    }

    #[tokio::test]
    async fn idle_service_has_no_caption() {
        let service = service();
        assert_eq!(service.now_reading().await.unwrap(), None);
        assert_eq!(service.snapshot().await.unwrap().status, PlaybackStatus::Idle);
        service.shutdown().await;
        assert!(!service.playback().is_running());
    }
}
