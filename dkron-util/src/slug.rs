use unicode_general_category::{get_general_category, GeneralCategory};

/// Turns free text into an identifier slug.
///
/// The input is trimmed and lowercased one character at a time, then
/// mapped: spaces and hyphens become `-`, letters (`L*`), decimal digits
/// (`Nd`) and `_` are kept and everything else is dropped. Runs are never
/// collapsed.
///
/// For example: `generate_slug("My cool object")` returns `"my-cool-object"`.
pub fn generate_slug(text: &str) -> String {
    text.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter_map(|ch| match ch {
            ' ' | '-' => Some('-'),
            '_' => Some(ch),
            ch if is_letter_or_digit(ch) => Some(ch),
            _ => None,
        })
        .collect()
}

fn is_letter_or_digit(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
    )
}

#[cfg(test)]
mod test {
    use super::generate_slug;

    #[test]
    fn test_generate_slug() {
        assert_eq!("my-cool-object", generate_slug("My cool object"));
        assert_eq!("a__b--c", generate_slug("A__B  C!!"));
        assert_eq!("job-1", generate_slug("  Job-1\t\n"));
        assert_eq!("", generate_slug("!!! ???"));
    }

    #[test]
    fn test_generate_slug_keeps_runs() {
        assert_eq!("a---b", generate_slug("a - b"));
        assert_eq!("x__y", generate_slug("x__y"));
    }

    #[test]
    fn test_generate_slug_unicode() {
        assert_eq!("ñandú-2", generate_slug("Ñandú 2"));
        assert_eq!("日本語", generate_slug("日本語!"));
        assert_eq!("٣٤", generate_slug("٣٤"));
    }

    #[test]
    fn test_generate_slug_only_decimal_digits() {
        assert_eq!("x", generate_slug("x²"));
        assert_eq!("-cup", generate_slug("½ cup"));
        assert_eq!("", generate_slug("Ⅻ"));
    }

    #[test]
    fn test_generate_slug_lowercases_per_char() {
        // No final-sigma rewriting.
        assert_eq!("οδοσ", generate_slug("ΟΔΟΣ"));
    }

    #[test]
    fn test_generate_slug_drops_marks() {
        // Devanagari vowel signs and virama are marks, not letters.
        assert_eq!("हनद", generate_slug("हिन्दी"));
    }
}
