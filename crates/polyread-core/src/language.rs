//! Supported languages and their classification profiles.
//!
//! The set of languages is closed: [`LanguageCode`] enumerates every language
//! the reader can classify, and each code maps to exactly one static
//! [`LanguageProfile`]. The registry is built once on first use and never
//! extended at runtime.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Errors ─────────────────────────────────────────────────────────

/// Errors raised when building language configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageError {
    /// A language code or tag does not name a supported language.
    #[error("Unsupported language '{0}' (expected one of pt, it, es, en, fr, de)")]
    UnknownLanguage(String),

    /// An active-language list was empty.
    #[error("At least one active language is required")]
    NoActiveLanguages,

    /// The same language appears twice in an active-language list.
    #[error("Language '{0}' is already active")]
    DuplicateLanguage(LanguageCode),

    /// A slot index outside the active-language list was addressed.
    #[error("Active language slot {slot} is out of range (have {len})")]
    SlotOutOfRange { slot: usize, len: usize },
}

// ── Language codes ─────────────────────────────────────────────────

/// A language the reader knows how to classify and voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    /// Brazilian Portuguese.
    Pt,
    /// Italian.
    It,
    /// Spanish.
    Es,
    /// English.
    En,
    /// French.
    Fr,
    /// German.
    De,
}

impl LanguageCode {
    /// Every supported language, in registry order.
    pub const ALL: [Self; 6] = [Self::Pt, Self::It, Self::Es, Self::En, Self::Fr, Self::De];

    /// Two-letter ISO 639-1 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::It => "it",
            Self::Es => "es",
            Self::En => "en",
            Self::Fr => "fr",
            Self::De => "de",
        }
    }

    /// Human-readable name, as shown in the language selectors.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Pt => "Português Brasileiro",
            Self::It => "Italiano",
            Self::Es => "Espanhol",
            Self::En => "Inglês",
            Self::Fr => "Francês",
            Self::De => "Alemão",
        }
    }

    /// Flag emoji used as a visual prefix for voices and captions.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Pt => "🇧🇷",
            Self::It => "🇮🇹",
            Self::Es => "🇪🇸",
            Self::En => "🇺🇸",
            Self::Fr => "🇫🇷",
            Self::De => "🇩🇪",
        }
    }

    /// Map a voice language tag (`"pt-BR"`, `"fr_FR"`, `"de"`) to a code.
    ///
    /// Only the primary subtag is considered; unsupported tags yield `None`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next()?.trim();
        Self::ALL
            .into_iter()
            .find(|code| code.code().eq_ignore_ascii_case(primary))
    }

    /// The static classification profile for this language.
    #[must_use]
    pub fn profile(self) -> &'static LanguageProfile {
        &PROFILES[self as usize]
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LanguageCode {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| LanguageError::UnknownLanguage(s.to_string()))
    }
}

// ── Profiles ───────────────────────────────────────────────────────

/// Lexicon and diacritic alphabet characteristic of one language.
#[derive(Debug)]
pub struct LanguageProfile {
    code: LanguageCode,
    lexicon: BTreeSet<&'static str>,
    diacritics: BTreeSet<char>,
}

impl LanguageProfile {
    fn new(code: LanguageCode, words: &[&'static str], chars: &[char]) -> Self {
        let profile = Self {
            code,
            lexicon: words.iter().copied().collect(),
            diacritics: chars.iter().copied().collect(),
        };
        debug_assert!(profile.validate().is_ok(), "invalid profile for {code}");
        profile
    }

    /// Language this profile describes.
    #[must_use]
    pub const fn code(&self) -> LanguageCode {
        self.code
    }

    /// Characteristic words, all lowercase.
    #[must_use]
    pub const fn lexicon(&self) -> &BTreeSet<&'static str> {
        &self.lexicon
    }

    /// Characters outside `[a-z]` that are typical of the language.
    #[must_use]
    pub const fn diacritics(&self) -> &BTreeSet<char> {
        &self.diacritics
    }

    /// Check the table invariants: lexicon entries are non-empty and already
    /// lowercase, diacritics are lowercase and outside ASCII.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(word) = self
            .lexicon
            .iter()
            .find(|w| w.is_empty() || w.to_lowercase() != **w)
        {
            return Err(format!("{}: lexicon entry '{word}' is not lowercase", self.code));
        }
        if let Some(ch) = self
            .diacritics
            .iter()
            .find(|c| c.is_ascii() || c.to_lowercase().ne(std::iter::once(**c)))
        {
            return Err(format!("{}: diacritic '{ch}' is not a lowercase non-ASCII letter", self.code));
        }
        Ok(())
    }
}

static PROFILES: LazyLock<[LanguageProfile; 6]> =
    LazyLock::new(|| LanguageCode::ALL.map(build_profile));

fn build_profile(code: LanguageCode) -> LanguageProfile {
    match code {
        LanguageCode::Pt => LanguageProfile::new(
            code,
            &[
                "pai", "mãe", "filho", "filha", "irmão", "irmã", "avô", "avó", "neto", "neta",
                "e", "o", "a", "os", "as", "um", "uma", "de", "do", "da", "dos", "das", "em",
                "no", "na", "com", "para", "por", "muito", "bem", "todo", "todos", "também",
                "como", "então", "mas", "onde", "quando", "quem", "que", "este", "esta",
                "estes", "estas", "seu", "sua", "seus", "suas", "nosso", "nossa", "nossos",
                "nossas", "mais", "vamos", "hoje", "família",
            ],
            &['ã', 'õ', 'ç', 'á', 'â', 'à', 'é', 'ê', 'í', 'ó', 'ô', 'ú'],
        ),
        LanguageCode::It => LanguageProfile::new(
            code,
            &[
                "padre", "madre", "figlio", "figlia", "fratello", "sorella", "nonno", "nonna",
                "nipote", "e", "il", "la", "lo", "gli", "le", "un", "una", "uno", "di", "del",
                "della", "dello", "dei", "delle", "degli", "in", "con", "per", "su", "molto",
                "bene", "tutto", "tutti", "anche", "come", "allora", "ma", "dove", "quando",
                "chi", "che", "cui", "questa", "questo", "questi", "queste", "suo", "sua",
                "suoi", "sue", "nostro", "nostra", "nostri", "nostre", "loro",
            ],
            &['à', 'è', 'é', 'ì', 'í', 'î', 'ò', 'ó', 'ô', 'ù', 'ú', 'û'],
        ),
        LanguageCode::Es => LanguageProfile::new(
            code,
            &[
                "padre", "madre", "hijo", "hija", "hermano", "hermana", "abuelo", "abuela",
                "nieto", "nieta", "y", "el", "la", "los", "las", "un", "una", "unos", "unas",
                "de", "del", "en", "con", "para", "por", "sobre", "muy", "bien", "todo",
                "todos", "también", "como", "entonces", "pero", "dónde", "cuándo", "quién",
                "que", "esta", "este", "estos", "estas", "su", "sus", "nuestro", "nuestra",
                "nuestros", "nuestras",
            ],
            &['á', 'é', 'í', 'ó', 'ú', 'ñ', 'ü'],
        ),
        LanguageCode::En => LanguageProfile::new(
            code,
            &[
                "father", "mother", "son", "daughter", "brother", "sister", "grandfather",
                "grandmother", "grandson", "granddaughter", "and", "the", "a", "an", "of",
                "in", "with", "for", "on", "very", "well", "all", "also", "as", "then", "but",
                "where", "when", "who", "that", "this", "these", "his", "her", "their", "our",
            ],
            &[],
        ),
        LanguageCode::Fr => LanguageProfile::new(
            code,
            &[
                "père", "mère", "fils", "fille", "frère", "sœur", "grand-père", "grand-mère",
                "petit-fils", "petite-fille", "et", "le", "la", "les", "un", "une", "des",
                "de", "du", "dans", "avec", "pour", "sur", "très", "bien", "tout", "tous",
                "aussi", "comme", "alors", "mais", "où", "comment", "quand", "qui", "que",
                "dont", "cette", "ces", "son", "sa", "ses", "notre", "nos", "leur", "leurs",
            ],
            &['ç', 'è', 'é', 'ê', 'ë', 'à', 'â', 'î', 'ï', 'ô', 'û', 'ù', 'ÿ', 'œ'],
        ),
        LanguageCode::De => LanguageProfile::new(
            code,
            &[
                "vater", "mutter", "sohn", "tochter", "bruder", "schwester", "großvater",
                "großmutter", "enkel", "enkelin", "und", "der", "die", "das", "den", "dem",
                "des", "ein", "eine", "einen", "einem", "einer", "eines", "von", "in", "mit",
                "für", "auf", "sehr", "gut", "alle", "auch", "wie", "dann", "aber", "wo",
                "wann", "wer", "dass", "diese", "dieser", "dieses", "sein", "seine", "ihr",
                "ihre", "unser", "unsere",
            ],
            &['ä', 'ö', 'ü', 'ß'],
        ),
    }
}

// ── Active language set ────────────────────────────────────────────

/// Ordered, non-empty, duplicate-free list of languages in use.
///
/// Order is priority: the classifier checks earlier languages first and
/// falls back to the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LanguageCode>", into = "Vec<LanguageCode>")]
pub struct ActiveLanguages(Vec<LanguageCode>);

impl ActiveLanguages {
    /// Build an active set, rejecting empty or duplicated lists.
    pub fn new(codes: impl IntoIterator<Item = LanguageCode>) -> Result<Self, LanguageError> {
        let mut list: Vec<LanguageCode> = Vec::new();
        for code in codes {
            if list.contains(&code) {
                return Err(LanguageError::DuplicateLanguage(code));
            }
            list.push(code);
        }
        if list.is_empty() {
            return Err(LanguageError::NoActiveLanguages);
        }
        Ok(Self(list))
    }

    /// The majority language: first in priority and the classification default.
    #[must_use]
    pub fn primary(&self) -> LanguageCode {
        self.0[0]
    }

    /// Languages in priority order.
    #[must_use]
    pub fn as_slice(&self) -> &[LanguageCode] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = LanguageCode> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// An active set is never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn contains(&self, code: LanguageCode) -> bool {
        self.0.contains(&code)
    }

    /// Swap the language in one selector slot.
    pub fn replace(&mut self, slot: usize, code: LanguageCode) -> Result<(), LanguageError> {
        let len = self.0.len();
        if slot >= len {
            return Err(LanguageError::SlotOutOfRange { slot, len });
        }
        if self.0[slot] == code {
            return Ok(());
        }
        if self.0.contains(&code) {
            return Err(LanguageError::DuplicateLanguage(code));
        }
        self.0[slot] = code;
        Ok(())
    }

    /// Union of the diacritic alphabets of every active language.
    #[must_use]
    pub fn diacritic_alphabet(&self) -> BTreeSet<char> {
        self.iter()
            .flat_map(|code| code.profile().diacritics().iter().copied())
            .collect()
    }
}

impl Default for ActiveLanguages {
    fn default() -> Self {
        Self(vec![LanguageCode::Pt, LanguageCode::Fr])
    }
}

impl TryFrom<Vec<LanguageCode>> for ActiveLanguages {
    type Error = LanguageError;

    fn try_from(codes: Vec<LanguageCode>) -> Result<Self, Self::Error> {
        Self::new(codes)
    }
}

impl From<ActiveLanguages> for Vec<LanguageCode> {
    fn from(active: ActiveLanguages) -> Self {
        active.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_profile_is_valid() {
        for code in LanguageCode::ALL {
            let profile = code.profile();
            assert_eq!(profile.code(), code);
            profile.validate().unwrap();
        }
    }

    #[test]
    fn english_has_no_diacritics() {
        assert!(LanguageCode::En.profile().diacritics().is_empty());
    }

    #[test]
    fn from_tag_uses_primary_subtag() {
        assert_eq!(LanguageCode::from_tag("pt-BR"), Some(LanguageCode::Pt));
        assert_eq!(LanguageCode::from_tag("FR_ca"), Some(LanguageCode::Fr));
        assert_eq!(LanguageCode::from_tag("de"), Some(LanguageCode::De));
        assert_eq!(LanguageCode::from_tag("ja-JP"), None);
        assert_eq!(LanguageCode::from_tag(""), None);
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert_eq!("es".parse::<LanguageCode>(), Ok(LanguageCode::Es));
        assert_eq!(
            "xx".parse::<LanguageCode>(),
            Err(LanguageError::UnknownLanguage("xx".to_string()))
        );
    }

    #[test]
    fn serde_uses_two_letter_codes() {
        let json = serde_json::to_string(&LanguageCode::De).unwrap();
        assert_eq!(json, "\"de\"");
        let parsed: LanguageCode = serde_json::from_str("\"it\"").unwrap();
        assert_eq!(parsed, LanguageCode::It);
    }

    #[test]
    fn active_languages_reject_empty_and_duplicates() {
        assert_eq!(
            ActiveLanguages::new([]),
            Err(LanguageError::NoActiveLanguages)
        );
        assert_eq!(
            ActiveLanguages::new([LanguageCode::Pt, LanguageCode::Pt]),
            Err(LanguageError::DuplicateLanguage(LanguageCode::Pt))
        );
    }

    #[test]
    fn active_languages_keep_priority_order() {
        let active = ActiveLanguages::new([LanguageCode::Fr, LanguageCode::En]).unwrap();
        assert_eq!(active.primary(), LanguageCode::Fr);
        assert_eq!(active.as_slice(), &[LanguageCode::Fr, LanguageCode::En]);
    }

    #[test]
    fn replace_slot() {
        let mut active = ActiveLanguages::default();
        active.replace(1, LanguageCode::It).unwrap();
        assert_eq!(active.as_slice(), &[LanguageCode::Pt, LanguageCode::It]);

        assert_eq!(
            active.replace(1, LanguageCode::Pt),
            Err(LanguageError::DuplicateLanguage(LanguageCode::Pt))
        );
        assert_eq!(
            active.replace(5, LanguageCode::De),
            Err(LanguageError::SlotOutOfRange { slot: 5, len: 2 })
        );
        // Re-selecting the same language in its own slot is fine.
        active.replace(0, LanguageCode::Pt).unwrap();
    }

    #[test]
    fn deserializing_empty_list_fails() {
        let result: Result<ActiveLanguages, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }

    #[test]
    fn diacritic_alphabet_is_union() {
        let active = ActiveLanguages::new([LanguageCode::De, LanguageCode::Es]).unwrap();
        let alphabet = active.diacritic_alphabet();
        assert!(alphabet.contains(&'ß'));
        assert!(alphabet.contains(&'ñ'));
        assert!(!alphabet.contains(&'œ'));
    }
}
