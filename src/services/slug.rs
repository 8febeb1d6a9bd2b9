//! URL slugs
//!
//! `create_slug` lowercases and trims the input, drops every character that
//! is not a word character, whitespace or hyphen, then collapses runs of
//! hyphens and whitespace into a single hyphen. Leading or trailing hyphens
//! in the input survive.

use once_cell::sync::Lazy;
use regex::Regex;

static STRIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static COLLAPSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// Derive a URL-safe slug from a title or name
pub fn create_slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = STRIP_RE.replace_all(lowered.trim(), "");
    COLLAPSE_RE.replace_all(&stripped, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_title() {
        assert_eq!(create_slug("Smart Irrigation Tips"), "smart-irrigation-tips");
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(create_slug("  What's New? 2024!  "), "whats-new-2024");
    }

    #[test]
    fn test_collapses_hyphens_and_spaces() {
        assert_eq!(create_slug("a -- b\t\tc"), "a-b-c");
    }

    #[test]
    fn test_keeps_underscores_and_unicode_letters() {
        assert_eq!(create_slug("snake_case Krishi"), "snake_case-krishi");
        assert_eq!(create_slug("Café Ürün"), "café-ürün");
    }

    #[test]
    fn test_edge_hyphens_survive() {
        assert_eq!(create_slug("-draft-"), "-draft-");
    }

    #[test]
    fn test_empty() {
        assert_eq!(create_slug(""), "");
        assert_eq!(create_slug("!!!"), "");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn slug_has_no_whitespace_or_uppercase(input in "[A-Za-z0-9 \t_.,!?'&()-]{0,60}") {
                let slug = create_slug(&input);
                prop_assert!(!slug.chars().any(char::is_whitespace));
                prop_assert!(!slug.contains("--"));
                prop_assert_eq!(slug.to_lowercase(), slug.clone());
            }

            #[test]
            fn slug_is_idempotent(input in "[A-Za-z0-9 _-]{0,40}") {
                let once = create_slug(&input);
                prop_assert_eq!(create_slug(&once), once);
            }
        }
    }
}
