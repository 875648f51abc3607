//! Property-style checks for the tokenizer and classifier.
//!
//! Every property is checked across a mixed-language corpus and every
//! ordering of a handful of active-language sets, rather than a few
//! hand-picked words.

use polyread_core::{
    ActiveLanguages, LanguageCode, analyze, classify, tokenize,
};

const LESSON: &str = "Hoje vamos aprender os nomes da família em francês. É um vocabulário \
fundamental e muito útil para qualquer conversa.

Os parentes mais próximos:

Pai: Père

Mãe: Mère

Irmã: Sœur

Avô: Grand-père

Neta: Petite-fille";

const NOISE: &[&str] = &[
    "", "-", "—", "...", "123", "¿Dónde?", "Straße", "naïve", "œuvre", "ÉTÉ", "l'été",
    "über-cool", "\u{200b}", "日本語", "🙂", "father's", "Großmutter!", "ñandú",
];

/// All non-empty, duplicate-free orderings drawn from a few language pools.
fn language_sets() -> Vec<ActiveLanguages> {
    let pools: &[&[LanguageCode]] = &[
        &[LanguageCode::Pt, LanguageCode::Fr],
        &[LanguageCode::Es, LanguageCode::It, LanguageCode::De],
        &[LanguageCode::En],
        &LanguageCode::ALL,
    ];

    let mut sets = Vec::new();
    for pool in pools {
        sets.push(ActiveLanguages::new(pool.iter().copied()).unwrap());
        sets.push(ActiveLanguages::new(pool.iter().rev().copied()).unwrap());
    }
    sets
}

#[test]
fn tokenize_counts_whitespace_fragments() {
    for text in [LESSON, "", "   ", "a  b\tc\n\nd", " \u{a0}x\u{2003}y "] {
        let tokens = tokenize(text);
        assert_eq!(tokens.len(), text.split_whitespace().count(), "text: {text:?}");
        for (expected, token) in tokens.iter().enumerate() {
            assert_eq!(token.index, expected);
            assert!(!token.text.is_empty());
            assert!(!token.text.chars().any(char::is_whitespace));
        }
    }
}

#[test]
fn classify_always_returns_an_active_language() {
    let words: Vec<String> = tokenize(LESSON)
        .into_iter()
        .map(|t| t.text)
        .chain(NOISE.iter().map(|w| (*w).to_string()))
        .collect();

    for active in language_sets() {
        for word in &words {
            let code = classify(word, &active);
            assert!(
                active.contains(code),
                "{word:?} classified as {code} outside {:?}",
                active.as_slice()
            );
        }
    }
}

#[test]
fn classify_is_deterministic() {
    for active in language_sets() {
        for word in NOISE {
            assert_eq!(classify(word, &active), classify(word, &active));
        }
    }
}

#[test]
fn documented_examples() {
    let active = ActiveLanguages::new([LanguageCode::Pt, LanguageCode::Fr]).unwrap();
    assert_eq!(classify("père", &active), LanguageCode::Fr);
    assert_eq!(classify("casa", &active), LanguageCode::Pt);
}

#[test]
fn lesson_vocabulary_is_split_by_language() {
    let active = ActiveLanguages::new([LanguageCode::Pt, LanguageCode::Fr]).unwrap();
    let annotated = analyze(LESSON, &active);

    let french: Vec<&str> = annotated
        .iter()
        .filter(|t| t.language == LanguageCode::Fr)
        .map(|t| t.text())
        .collect();

    assert_eq!(french, ["Père", "Mère", "Sœur", "Grand-père", "Petite-fille"]);
}
