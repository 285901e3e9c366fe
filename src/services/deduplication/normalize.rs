//! Text normalization for fuzzy keys and fingerprints.

/// Normalizes text for comparison.
///
/// Lowercases, drops every character that is neither a word character
/// (alphanumeric or `_`) nor whitespace, collapses whitespace runs to a
/// single space, and trims. Idempotent.
///
/// # Example
///
/// ```rust
/// use jobsift::services::deduplication::normalize;
///
/// assert_eq!(normalize("  Senior  Engineer (Remote)!\n"), "senior engineer remote");
/// assert_eq!(normalize(&normalize("C++ / Rust")), normalize("C++ / Rust"));
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
        } else if is_word_char(c) {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }

    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Hello, World!"), "hello world");
        assert_eq!(normalize("Sr. Engineer - Payments"), "sr engineer payments");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("a \t\n b    c"), "a b c");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_keeps_underscores_and_digits() {
        assert_eq!(normalize("snake_case 2024-05-01"), "snake_case 20240501");
    }

    #[test]
    fn test_punctuation_only_word_disappears() {
        // The dash between words leaves a single space, not two.
        assert_eq!(normalize("backend - platform"), "backend platform");
    }

    #[test]
    fn test_unicode_letters_are_word_chars() {
        assert_eq!(normalize("München, Deutschland"), "münchen deutschland");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize("  Staff ENGINEER, (Infra)  ");
        assert_eq!(normalize(&once), once);
    }
}
