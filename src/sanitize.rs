//! Filename slugs from free-form model output.

/// Longest slug [`sanitize_filename`] produces.
pub const MAX_FILENAME_LEN: usize = 30;

/// Normalize arbitrary text into a lowercase hyphenated slug.
///
/// Quotes are dropped, whitespace runs and hyphen runs become a single
/// hyphen, every other non-ASCII-alphanumeric character is removed, and the
/// result is cut to [`MAX_FILENAME_LEN`] without leaving a dangling hyphen.
/// Returns an empty string when nothing usable remains.
///
/// Pure and idempotent.
#[must_use]
pub fn sanitize_filename(input: &str) -> String {
    let mut result = String::with_capacity(MAX_FILENAME_LEN);
    let mut pending_hyphen = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            let needed = if pending_hyphen && !result.is_empty() { 2 } else { 1 };
            if result.len() + needed > MAX_FILENAME_LEN {
                break;
            }
            if needed == 2 {
                result.push('-');
            }
            result.push(ch.to_ascii_lowercase());
            pending_hyphen = false;
        } else if ch == '-' || ch.is_whitespace() {
            pending_hyphen = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_slug(s: &str) -> bool {
        s.is_empty()
            || (s.split('-').all(|part| {
                !part.is_empty() && part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            }))
    }

    #[test]
    fn sentence_with_punctuation() {
        assert_eq!(sanitize_filename("A Red Sports Car!"), "a-red-sports-car");
    }

    #[test]
    fn strips_quotes_without_splitting() {
        assert_eq!(sanitize_filename("\"sunset-over-'the' bay\""), "sunset-over-the-bay");
        assert_eq!(sanitize_filename("don't panic"), "dont-panic");
    }

    #[test]
    fn collapses_hyphens_and_whitespace() {
        assert_eq!(sanitize_filename("  cat --  on\t\na   mat  "), "cat-on-a-mat");
        assert_eq!(sanitize_filename("---a---"), "a");
    }

    #[test]
    fn removes_underscores_and_non_ascii() {
        assert_eq!(sanitize_filename("snake_case name"), "snakecase-name");
        assert_eq!(sanitize_filename("café au lait"), "caf-au-lait");
        assert_eq!(sanitize_filename("猫"), "");
    }

    #[test]
    fn truncates_without_trailing_hyphen() {
        let out = sanitize_filename("abcdefghij abcdefghij abcdefgh xyz");
        assert_eq!(out, "abcdefghij-abcdefghij-abcdefgh");
        assert_eq!(out.len(), 30);

        let out = sanitize_filename("abcdefghij abcdefghij abcdefghi xyz");
        assert_eq!(out, "abcdefghij-abcdefghij-abcdefgh");
        assert!(!out.ends_with('-'));

        let out = sanitize_filename(&"a".repeat(29).chars().chain(" b".chars()).collect::<String>());
        assert_eq!(out, "a".repeat(29));
    }

    #[test]
    fn empty_and_symbol_only() {
        assert_eq!(sanitize_filename(""), "");
        assert_eq!(sanitize_filename("!!! ??? ..."), "");
    }

    #[test]
    fn idempotent_and_well_formed() {
        let samples = [
            "A Red Sports Car!",
            "  --Hello,   World--  ",
            "\"quoted\" 'name'",
            "x".repeat(80).as_str(),
            "a - b _ c . d",
            "Ünïcödé Ñame 2024",
            "filename.jpg",
            "1 2 3 4 5 6 7 8 9 10 11 12 13 14 15",
            "",
        ]
        .map(str::to_string);
        for sample in &samples {
            let once = sanitize_filename(sample);
            assert_eq!(sanitize_filename(&once), once, "not idempotent for {sample:?}");
            assert!(once.len() <= MAX_FILENAME_LEN);
            assert!(is_slug(&once), "malformed slug {once:?} from {sample:?}");
        }
    }
}
