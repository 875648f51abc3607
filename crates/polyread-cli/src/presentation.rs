//! Terminal formatting shared by the handlers.

use console::{StyledObject, style};

use polyread_core::{ActiveLanguages, AnnotatedToken, LanguageCode};

/// Truncates a string to at most `max_chars` characters, adding "..." if
/// needed.
///
/// # Examples
///
/// ```rust
/// use polyread_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Père", 10), "Père");
/// assert_eq!(truncate_string("Petite-fille", 8), "Petit...");
/// ```
#[must_use]
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// `🇫🇷 Francês`
#[must_use]
pub fn language_label(language: LanguageCode) -> String {
    format!("{} {}", language.flag(), language.display_name())
}

/// A word styled for display: words outside the primary language stand out.
#[must_use]
pub fn styled_word<'a>(token: &'a AnnotatedToken, active: &ActiveLanguages) -> StyledObject<&'a str> {
    let word = style(token.text());
    if token.is_secondary(active) {
        word.cyan().bold()
    } else {
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_no_truncation_needed() {
        assert_eq!(truncate_string("short", 10), "short");
    }

    #[test]
    fn test_truncate_string_counts_characters() {
        assert_eq!(truncate_string("Grand-mère", 10), "Grand-mère");
        assert_eq!(truncate_string("Grand-mère!", 10), "Grand-m...");
    }

    #[test]
    fn test_language_label() {
        assert_eq!(language_label(LanguageCode::Fr), "🇫🇷 Francês");
        assert_eq!(language_label(LanguageCode::Pt), "🇧🇷 Português Brasileiro");
    }
}
