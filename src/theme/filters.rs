//! Custom Tera filters
//!
//! - `datetime(format="%B %d, %Y")`: format an RFC 3339 timestamp, empty for null
//! - `truncate_words(length=50)`: keep the first N words and append `...`

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDateTime};
use std::collections::HashMap;
use tera::{Tera, Value};

use super::ThemeError;

pub const DEFAULT_DATETIME_FORMAT: &str = "%B %d, %Y";
pub const DEFAULT_TRUNCATE_WORDS: usize = 50;

pub fn register(tera: &mut Tera) {
    tera.register_filter("datetime", datetime_filter);
    tera.register_filter("truncate_words", truncate_words_filter);
}

fn invalid(msg: String) -> tera::Error {
    tera::Error::msg(ThemeError::InvalidArgument(msg).to_string())
}

fn datetime_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let format = match args.get("format") {
        Some(Value::String(f)) => f.as_str(),
        Some(other) => return Err(invalid(format!("datetime format {}", other))),
        None => DEFAULT_DATETIME_FORMAT,
    };

    let raw = match value {
        Value::Null => return Ok(Value::String(String::new())),
        Value::String(s) => s.as_str(),
        other => return Err(invalid(format!("datetime value {}", other))),
    };

    format_datetime(raw, format)
        .map(Value::String)
        .map_err(|e| tera::Error::msg(e.to_string()))
}

/// Format a stored timestamp; unparsable input is returned unchanged
pub fn format_datetime(raw: &str, format: &str) -> Result<String, ThemeError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ThemeError::InvalidArgument(format!(
            "invalid datetime format '{}'",
            format
        )));
    }

    if raw.is_empty() {
        return Ok(String::new());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.format(format).to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt.format(format).to_string());
    }
    Ok(raw.to_string())
}

fn truncate_words_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let length = match args.get("length") {
        Some(v) => v
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| invalid(format!("truncate_words length {}", v)))?,
        None => DEFAULT_TRUNCATE_WORDS,
    };

    let text = match value {
        Value::Null => "",
        Value::String(s) => s.as_str(),
        other => return Err(invalid(format!("truncate_words value {}", other))),
    };

    Ok(Value::String(truncate_words(text, length)))
}

/// First `length` words followed by `...`, or `text` unchanged if it is short enough
pub fn truncate_words(text: &str, length: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= length {
        return text.to_string();
    }
    format!("{}...", words[..length].join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tera::Context;

    fn render(template: &str, context: &Context) -> String {
        let mut tera = Tera::default();
        register(&mut tera);
        tera.render_str(template, context).expect("render failed")
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(
            format_datetime("2024-03-05T10:00:00Z", DEFAULT_DATETIME_FORMAT).unwrap(),
            "March 05, 2024"
        );
        assert_eq!(
            format_datetime("2024-03-05T10:00:00.123456Z", "%Y-%m-%d").unwrap(),
            "2024-03-05"
        );
        assert_eq!(
            format_datetime("2024-03-05 10:00:00", "%d/%m").unwrap(),
            "05/03"
        );
        assert_eq!(format_datetime("yesterday", "%Y").unwrap(), "yesterday");
        assert!(format_datetime("2024-03-05T10:00:00Z", "%Q").is_err());
    }

    #[test]
    fn test_datetime_filter_null_is_empty() {
        let mut ctx = Context::new();
        ctx.insert("when", &Option::<String>::None);
        assert_eq!(render("[{{ when | datetime }}]", &ctx), "[]");
    }

    #[test]
    fn test_datetime_filter_with_format() {
        let mut ctx = Context::new();
        ctx.insert("when", "2023-12-25T08:30:00+00:00");
        assert_eq!(
            render(r#"{{ when | datetime(format="%b %Y") }}"#, &ctx),
            "Dec 2023"
        );
    }

    #[test]
    fn test_truncate_words() {
        assert_eq!(truncate_words("one two three", 3), "one two three");
        assert_eq!(truncate_words("one  two three", 2), "one two...");
        assert_eq!(truncate_words("", 5), "");
        assert_eq!(truncate_words("  keep   spacing ", 5), "  keep   spacing ");
    }

    #[test]
    fn test_truncate_words_filter() {
        let mut ctx = Context::new();
        ctx.insert("text", "a b c d e");
        ctx.insert("missing", &Option::<String>::None);
        assert_eq!(render("{{ text | truncate_words(length=2) }}", &ctx), "a b...");
        assert_eq!(render("{{ text | truncate_words }}", &ctx), "a b c d e");
        assert_eq!(render("[{{ missing | truncate_words }}]", &ctx), "[]");
    }

    mod property_tests {
        use super::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn truncated_output_has_at_most_length_words(
                words in prop::collection::vec("[a-z]{1,8}", 0..40),
                length in 0usize..30,
            ) {
                let text = words.join(" ");
                let out = truncate_words(&text, length);
                if words.len() <= length {
                    prop_assert_eq!(out, text);
                } else {
                    prop_assert!(out.ends_with("..."));
                    let kept = out.trim_end_matches("...");
                    prop_assert_eq!(kept.split_whitespace().count(), length);
                }
            }
        }
    }
}
