//! Per-token language classifier.
//!
//! A deterministic heuristic, not a language-identification model. Each token
//! is checked against the active languages in priority order:
//!
//! 1. **Lexicon pass**: the normalised token equals, or contains, a word from
//!    a language's lexicon. Containment catches compound forms such as
//!    `grand-père` without a separate compounding rule.
//! 2. **Diacritic pass**: the original token contains a character from a
//!    language's diacritic alphabet.
//! 3. **Default**: the first active language.
//!
//! The lexicon pass runs over *every* active language before any diacritic is
//! considered, so a lexicon hit in a lower-priority language beats a diacritic
//! hit in a higher-priority one.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::language::{ActiveLanguages, LanguageCode};
use crate::tokenizer::{Token, tokenize};

/// Lexicon entries shorter than this (in characters) only match a whole
/// token, never a substring of one.
///
/// Two- and three-letter function words (`sa`, `de`, `com`) otherwise claim
/// unrelated words that merely contain them (`casa`, `comme`). With the
/// threshold, `casa` keeps the primary-language fallback instead of going to
/// French through `sa`.
pub const MIN_SUBSTRING_CHARS: usize = 4;

/// A token paired with the language it will be spoken in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    pub token: Token,
    pub language: LanguageCode,
}

impl AnnotatedToken {
    /// Word text as written.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.token.text
    }

    /// Position in reading order.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.token.index
    }

    /// Whether this token is in a language other than the primary one.
    ///
    /// Display layers use this to set foreign words apart.
    #[must_use]
    pub fn is_secondary(&self, active: &ActiveLanguages) -> bool {
        self.language != active.primary()
    }
}

/// Classify a single token. The result is always a member of `active`.
#[must_use]
pub fn classify(token: &str, active: &ActiveLanguages) -> LanguageCode {
    let alphabet = active.diacritic_alphabet();
    classify_with_alphabet(token, active, &alphabet)
}

/// Classify every token of a sequence.
#[must_use]
pub fn annotate(tokens: Vec<Token>, active: &ActiveLanguages) -> Vec<AnnotatedToken> {
    let alphabet = active.diacritic_alphabet();
    tokens
        .into_iter()
        .map(|token| {
            let language = classify_with_alphabet(&token.text, active, &alphabet);
            AnnotatedToken { token, language }
        })
        .collect()
}

/// Tokenize and classify `text` in one step.
#[must_use]
pub fn analyze(text: &str, active: &ActiveLanguages) -> Vec<AnnotatedToken> {
    annotate(tokenize(text), active)
}

/// Lowercase `token` and keep only `[a-z]`, hyphens and characters from
/// `alphabet`.
#[must_use]
pub fn normalize(token: &str, alphabet: &BTreeSet<char>) -> String {
    token
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || *c == '-' || alphabet.contains(c))
        .collect()
}

fn classify_with_alphabet(
    token: &str,
    active: &ActiveLanguages,
    alphabet: &BTreeSet<char>,
) -> LanguageCode {
    let normalized = normalize(token, alphabet);

    if let Some(code) = active.iter().find(|code| lexicon_matches(*code, &normalized)) {
        return code;
    }

    if let Some(code) = active.iter().find(|code| has_diacritic(*code, token)) {
        return code;
    }

    active.primary()
}

fn lexicon_matches(code: LanguageCode, normalized: &str) -> bool {
    if normalized.is_empty() {
        return false;
    }
    code.profile().lexicon().iter().any(|word| {
        *word == normalized
            || (word.chars().count() >= MIN_SUBSTRING_CHARS && normalized.contains(word))
    })
}

fn has_diacritic(code: LanguageCode, token: &str) -> bool {
    let diacritics = code.profile().diacritics();
    token
        .chars()
        .flat_map(char::to_lowercase)
        .any(|c| diacritics.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(codes: &[LanguageCode]) -> ActiveLanguages {
        ActiveLanguages::new(codes.iter().copied()).unwrap()
    }

    #[test]
    fn lexicon_match_wins() {
        let active = langs(&[LanguageCode::Pt, LanguageCode::Fr]);
        assert_eq!(classify("père", &active), LanguageCode::Fr);
        assert_eq!(classify("Mère", &active), LanguageCode::Fr);
        assert_eq!(classify("Pai:", &active), LanguageCode::Pt);
    }

    #[test]
    fn unmatched_token_defaults_to_primary() {
        let active = langs(&[LanguageCode::Pt, LanguageCode::Fr]);
        assert_eq!(classify("casa", &active), LanguageCode::Pt);

        let reversed = langs(&[LanguageCode::Fr, LanguageCode::Pt]);
        assert_eq!(classify("casa", &reversed), LanguageCode::Fr);
    }

    #[test]
    fn compound_forms_match_by_containment() {
        let active = langs(&[LanguageCode::Pt, LanguageCode::Fr]);
        assert_eq!(classify("Grand-père", &active), LanguageCode::Fr);
        assert_eq!(classify("Petite-fille", &active), LanguageCode::Fr);
        assert_eq!(classify("Petit-fils", &active), LanguageCode::Fr);
    }

    #[test]
    fn short_entries_match_whole_tokens_only() {
        let active = langs(&[LanguageCode::Pt, LanguageCode::Fr]);
        // "com" must not claim the French "comme".
        assert_eq!(classify("comme", &active), LanguageCode::Fr);
        // French "sa" sits inside "casa" but is too short to count.
        assert_eq!(classify("casa", &active), LanguageCode::Pt);
        // "de" is in both lexicons; the earlier language wins.
        assert_eq!(classify("de", &active), LanguageCode::Pt);
    }

    #[test]
    fn ligature_survives_normalisation() {
        let active = langs(&[LanguageCode::Pt, LanguageCode::Fr]);
        assert_eq!(normalize("Sœur", &active.diacritic_alphabet()), "sœur");
        assert_eq!(classify("Sœur", &active), LanguageCode::Fr);
    }

    #[test]
    fn diacritic_pass_follows_priority() {
        let active = langs(&[LanguageCode::Pt, LanguageCode::Fr]);
        // ê is both Portuguese and French; Portuguese is checked first.
        assert_eq!(classify("francês.", &active), LanguageCode::Pt);
        // è is French only.
        assert_eq!(classify("zèbre", &active), LanguageCode::Fr);
    }

    #[test]
    fn diacritic_check_is_case_insensitive() {
        let active = langs(&[LanguageCode::Fr, LanguageCode::Pt]);
        assert_eq!(classify("Ã", &active), LanguageCode::Pt);
    }

    #[test]
    fn lexicon_beats_earlier_diacritic() {
        // ü is a Spanish diacritic, but "für" is a German lexicon word.
        let active = langs(&[LanguageCode::Es, LanguageCode::De]);
        assert_eq!(classify("für", &active), LanguageCode::De);
        assert_eq!(classify("pingüino", &active), LanguageCode::Es);
    }

    #[test]
    fn punctuation_only_token_falls_back() {
        let active = langs(&[LanguageCode::En, LanguageCode::De]);
        assert_eq!(normalize("—!?", &active.diacritic_alphabet()), "");
        assert_eq!(classify("—!?", &active), LanguageCode::En);
    }

    #[test]
    fn normalisation_strips_foreign_diacritics() {
        let active = langs(&[LanguageCode::En, LanguageCode::De]);
        assert_eq!(normalize("Großvater,", &active.diacritic_alphabet()), "großvater");
        assert_eq!(normalize("père", &active.diacritic_alphabet()), "pre");
    }

    #[test]
    fn single_language_always_wins() {
        let active = langs(&[LanguageCode::It]);
        for word in ["père", "father", "Großvater", "", "?!"] {
            assert_eq!(classify(word, &active), LanguageCode::It);
        }
    }

    #[test]
    fn annotate_preserves_order_and_indices() {
        let active = langs(&[LanguageCode::Pt, LanguageCode::Fr]);
        let annotated = analyze("Pai: Père", &active);
        assert_eq!(annotated.len(), 2);
        assert_eq!(annotated[0].index(), 0);
        assert_eq!(annotated[0].language, LanguageCode::Pt);
        assert_eq!(annotated[1].index(), 1);
        assert_eq!(annotated[1].text(), "Père");
        assert_eq!(annotated[1].language, LanguageCode::Fr);
        assert!(annotated[1].is_secondary(&active));
        assert!(!annotated[0].is_secondary(&active));
    }
}
