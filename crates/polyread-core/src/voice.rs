//! Voice catalog port and per-language voice selection.
//!
//! The host platform owns the list of installed voices and may populate it
//! late or change it at any time. The core only sees it through
//! [`VoiceCatalog`]. [`VoiceDirectory`] is the in-memory implementation: it
//! publishes every catalog change on a `watch` channel so consumers can
//! recompute their default [`VoiceSelection`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::language::{ActiveLanguages, LanguageCode};

// ── Types ──────────────────────────────────────────────────────────

/// A voice offered by the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    /// Stable identifier used in selections and speech requests.
    pub id: String,
    /// Language tag as reported by the host (e.g. `"fr-FR"`).
    pub language_tag: String,
    /// Label shown in voice selectors.
    pub display_name: String,
}

impl Voice {
    /// Build a voice whose display name is prefixed with its language flag.
    pub fn new(id: impl Into<String>, language_tag: impl Into<String>, name: &str) -> Self {
        let language_tag = language_tag.into();
        let display_name = match LanguageCode::from_tag(&language_tag) {
            Some(code) => format!("{} {name}", code.flag()),
            None => name.to_string(),
        };
        Self {
            id: id.into(),
            language_tag,
            display_name,
        }
    }

    /// Supported language this voice speaks, if any.
    #[must_use]
    pub fn language(&self) -> Option<LanguageCode> {
        LanguageCode::from_tag(&self.language_tag)
    }
}

/// A voice that has been resolved for a specific language, ready to be put
/// into a speech request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceHandle {
    pub id: String,
    pub language: LanguageCode,
    pub display_name: String,
}

// ── Port ───────────────────────────────────────────────────────────

/// Read access to the voices available on the host.
///
/// Implementations must tolerate being empty (voices often arrive after
/// startup).
pub trait VoiceCatalog: Send + Sync {
    /// Every known voice.
    fn list_voices(&self) -> Vec<Voice>;

    /// Resolve `voice_id` for `language`.
    ///
    /// Returns `None` when the voice does not exist or speaks another
    /// language.
    fn resolve(&self, language: LanguageCode, voice_id: &str) -> Option<VoiceHandle> {
        self.list_voices()
            .into_iter()
            .find(|voice| voice.id == voice_id && voice.language() == Some(language))
            .map(|voice| VoiceHandle {
                id: voice.id,
                language,
                display_name: voice.display_name,
            })
    }
}

// ── In-memory directory ────────────────────────────────────────────

/// Refreshable in-memory voice catalog.
///
/// Voices whose tag does not map to a supported language are dropped on
/// insertion. Cloning shares the underlying channel.
#[derive(Debug, Clone)]
pub struct VoiceDirectory {
    tx: Arc<watch::Sender<Arc<[Voice]>>>,
}

impl VoiceDirectory {
    /// Create a directory holding `voices`.
    #[must_use]
    pub fn new(voices: Vec<Voice>) -> Self {
        let (tx, _rx) = watch::channel(Self::supported(voices));
        Self { tx: Arc::new(tx) }
    }

    /// Create an empty directory (the usual state at startup).
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Replace the whole catalog and notify subscribers.
    pub fn replace(&self, voices: Vec<Voice>) {
        let voices = Self::supported(voices);
        tracing::debug!(count = voices.len(), "Voice catalog updated");
        self.tx.send_replace(voices);
    }

    /// Observe catalog changes. The receiver starts with the current catalog
    /// marked as seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<[Voice]>> {
        self.tx.subscribe()
    }

    /// Current snapshot of the catalog.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[Voice]> {
        Arc::clone(&self.tx.borrow())
    }

    /// Voices speaking `language`, in catalog order.
    #[must_use]
    pub fn voices_for(&self, language: LanguageCode) -> Vec<Voice> {
        self.snapshot()
            .iter()
            .filter(|voice| voice.language() == Some(language))
            .cloned()
            .collect()
    }

    fn supported(voices: Vec<Voice>) -> Arc<[Voice]> {
        voices
            .into_iter()
            .filter(|voice| voice.language().is_some())
            .collect()
    }
}

impl Default for VoiceDirectory {
    fn default() -> Self {
        Self::empty()
    }
}

impl VoiceCatalog for VoiceDirectory {
    fn list_voices(&self) -> Vec<Voice> {
        self.snapshot().to_vec()
    }
}

// ── Selection ──────────────────────────────────────────────────────

/// Chosen voice id per language. A language may have no voice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceSelection(BTreeMap<LanguageCode, String>);

impl VoiceSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Voice chosen for `language`.
    #[must_use]
    pub fn get(&self, language: LanguageCode) -> Option<&str> {
        self.0.get(&language).map(String::as_str)
    }

    pub fn set(&mut self, language: LanguageCode, voice_id: impl Into<String>) {
        self.0.insert(language, voice_id.into());
    }

    pub fn remove(&mut self, language: LanguageCode) -> Option<String> {
        self.0.remove(&language)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LanguageCode, &str)> {
        self.0.iter().map(|(code, id)| (*code, id.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve the selected voice for `language` against `catalog`.
    #[must_use]
    pub fn resolve(&self, language: LanguageCode, catalog: &dyn VoiceCatalog) -> Option<VoiceHandle> {
        self.get(language)
            .and_then(|voice_id| catalog.resolve(language, voice_id))
    }

    /// Recompute the selection for the active languages after a catalog
    /// change.
    ///
    /// A previous choice is kept while it still resolves; otherwise the first
    /// catalog voice for that language becomes the default. Languages with no
    /// voice stay unselected.
    #[must_use]
    pub fn with_defaults(
        active: &ActiveLanguages,
        catalog: &dyn VoiceCatalog,
        previous: &Self,
    ) -> Self {
        let voices = catalog.list_voices();
        let mut selection = Self::new();
        for language in active.iter() {
            let kept = previous
                .get(language)
                .filter(|id| catalog.resolve(language, id).is_some());
            let chosen = kept.map(str::to_string).or_else(|| {
                voices
                    .iter()
                    .find(|voice| voice.language() == Some(language))
                    .map(|voice| voice.id.clone())
            });
            if let Some(voice_id) = chosen {
                selection.set(language, voice_id);
            }
        }
        selection
    }
}

impl FromIterator<(LanguageCode, String)> for VoiceSelection {
    fn from_iter<I: IntoIterator<Item = (LanguageCode, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> VoiceDirectory {
        VoiceDirectory::new(vec![
            Voice::new("luciana", "pt-BR", "Luciana"),
            Voice::new("felipe", "pt-BR", "Felipe"),
            Voice::new("thomas", "fr-FR", "Thomas"),
            Voice::new("kyoko", "ja-JP", "Kyoko"),
        ])
    }

    #[test]
    fn display_name_carries_flag() {
        let voice = Voice::new("amelie", "fr-CA", "Amélie");
        assert_eq!(voice.display_name, "🇫🇷 Amélie");
        assert_eq!(voice.language(), Some(LanguageCode::Fr));
    }

    #[test]
    fn unsupported_voices_are_dropped() {
        let directory = catalog();
        assert_eq!(directory.list_voices().len(), 3);
        assert!(directory.list_voices().iter().all(|v| v.id != "kyoko"));
    }

    #[test]
    fn resolve_checks_language() {
        let directory = catalog();
        let handle = directory.resolve(LanguageCode::Fr, "thomas").unwrap();
        assert_eq!(handle.language, LanguageCode::Fr);
        assert_eq!(handle.display_name, "🇫🇷 Thomas");

        assert!(directory.resolve(LanguageCode::Pt, "thomas").is_none());
        assert!(directory.resolve(LanguageCode::Fr, "nobody").is_none());
    }

    #[test]
    fn defaults_pick_first_voice_per_language() {
        let directory = catalog();
        let active = ActiveLanguages::new([LanguageCode::Pt, LanguageCode::Fr, LanguageCode::De])
            .unwrap();
        let selection = VoiceSelection::with_defaults(&active, &directory, &VoiceSelection::new());

        assert_eq!(selection.get(LanguageCode::Pt), Some("luciana"));
        assert_eq!(selection.get(LanguageCode::Fr), Some("thomas"));
        assert_eq!(selection.get(LanguageCode::De), None);
    }

    #[test]
    fn defaults_keep_valid_previous_choice() {
        let directory = catalog();
        let active = ActiveLanguages::default();
        let mut previous = VoiceSelection::new();
        previous.set(LanguageCode::Pt, "felipe");
        previous.set(LanguageCode::Fr, "removed-voice");

        let selection = VoiceSelection::with_defaults(&active, &directory, &previous);
        assert_eq!(selection.get(LanguageCode::Pt), Some("felipe"));
        assert_eq!(selection.get(LanguageCode::Fr), Some("thomas"));
    }

    #[test]
    fn defaults_drop_inactive_languages() {
        let directory = catalog();
        let active = ActiveLanguages::new([LanguageCode::Fr]).unwrap();
        let mut previous = VoiceSelection::new();
        previous.set(LanguageCode::Pt, "felipe");

        let selection = VoiceSelection::with_defaults(&active, &directory, &previous);
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.get(LanguageCode::Pt), None);
    }

    #[test]
    fn empty_catalog_yields_empty_selection() {
        let directory = VoiceDirectory::empty();
        let selection = VoiceSelection::with_defaults(
            &ActiveLanguages::default(),
            &directory,
            &VoiceSelection::new(),
        );
        assert!(selection.is_empty());
    }

    #[test]
    fn replace_notifies_subscribers() {
        let directory = VoiceDirectory::empty();
        let mut rx = directory.subscribe();
        assert!(!rx.has_changed().unwrap());

        directory.replace(vec![Voice::new("anna", "de-DE", "Anna")]);

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
        assert_eq!(directory.voices_for(LanguageCode::De).len(), 1);
    }

    #[test]
    fn selection_serializes_as_map() {
        let selection: VoiceSelection = [(LanguageCode::Fr, "thomas".to_string())]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"{"fr":"thomas"}"#);
    }
}
