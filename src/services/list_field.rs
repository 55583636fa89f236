//! Decoding of list-shaped text columns.
//!
//! Ingredient, step and meal columns have been written over time as plain
//! delimited text, as JSON arrays, and as JSON arrays that were re-encoded
//! into a JSON string one or more times. Nothing in the schema says which, so
//! decoding peels JSON layers for a bounded number of attempts and otherwise
//! falls back to splitting on newline, comma and semicolon.

use serde_json::Value;

/// JSON parse attempts before falling back to delimiter splitting
const MAX_PARSE_ATTEMPTS: usize = 3;

/// Outcome of a single JSON parse attempt
#[derive(Debug, PartialEq)]
enum Attempt {
    /// A terminal list
    Parsed(Vec<String>),
    /// Another encoded layer to peel
    Retry(String),
    /// Not JSON, or JSON of a shape that is not a list
    Failed,
}

fn parse_once(input: &str) -> Attempt {
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Array(items)) => match items.as_slice() {
            [Value::String(inner)] if inner.trim_start().starts_with('[') => {
                Attempt::Retry(inner.clone())
            }
            _ => Attempt::Parsed(items.into_iter().filter_map(item_text).collect()),
        },
        Ok(Value::String(inner)) => Attempt::Retry(inner),
        Ok(_) | Err(_) => Attempt::Failed,
    }
}

fn item_text(item: Value) -> Option<String> {
    let text = match item {
        Value::Null => return None,
        Value::String(s) => s,
        other => other.to_string(),
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Characters that separate entries in the plain-text encoding
pub const LIST_DELIMITERS: [char; 4] = ['\n', '\r', ',', ';'];

/// Splits on newline, comma and semicolon, dropping blank segments
pub fn split_delimited(input: &str) -> Vec<String> {
    input
        .split(LIST_DELIMITERS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Recovers an ordered list of non-empty trimmed strings from a raw column value.
///
/// Never fails: input that cannot be read as a JSON list is split on
/// delimiters instead.
pub fn decode(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let mut current = raw.trim().to_string();
    if current.is_empty() {
        return Vec::new();
    }

    for _ in 0..MAX_PARSE_ATTEMPTS {
        match parse_once(&current) {
            Attempt::Parsed(items) => return items,
            Attempt::Retry(inner) => current = inner.trim().to_string(),
            Attempt::Failed => break,
        }
    }

    split_delimited(&current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_none_and_blank() {
        assert!(decode(None).is_empty());
        assert!(decode(Some("")).is_empty());
        assert!(decode(Some("   \n ")).is_empty());
    }

    #[test]
    fn test_decode_json_array() {
        assert_eq!(decode(Some(r#"["a","b"]"#)), vec!["a", "b"]);
    }

    #[test]
    fn test_decode_empty_json_array() {
        assert!(decode(Some("[]")).is_empty());
    }

    #[test]
    fn test_decode_unwraps_reencoded_array() {
        assert_eq!(decode(Some(r#"["[\"a\",\"b\"]"]"#)), vec!["a", "b"]);
    }

    #[test]
    fn test_decode_unwraps_json_string_layers() {
        // a JSON array serialized into a JSON string, twice
        let once = serde_json::to_string(&vec!["egg", "rice"]).unwrap();
        let twice = serde_json::to_string(&once).unwrap();
        let thrice = serde_json::to_string(&twice).unwrap();
        assert_eq!(decode(Some(&twice)), vec!["egg", "rice"]);
        assert_eq!(decode(Some(&thrice)), vec!["egg", "rice"]);
    }

    #[test]
    fn test_decode_gives_up_after_bounded_attempts() {
        let mut encoded = serde_json::to_string(&vec!["egg"]).unwrap();
        for _ in 0..5 {
            encoded = serde_json::to_string(&encoded).unwrap();
        }
        let decoded = decode(Some(&encoded));
        assert!(!decoded.is_empty());
        assert!(decoded.iter().all(|s| !s.trim().is_empty()));
    }

    #[test]
    fn test_decode_plain_delimited_text() {
        assert_eq!(decode(Some("a,b,,c")), vec!["a", "b", "c"]);
        assert_eq!(decode(Some("a, ,b")), vec!["a", "b"]);
        assert_eq!(
            decode(Some("boil water\r\nadd rice; stir")),
            vec!["boil water", "add rice", "stir"]
        );
    }

    #[test]
    fn test_decode_strips_degenerate_entries() {
        assert!(decode(Some(r#"[""]"#)).is_empty());
        assert_eq!(decode(Some(r#"["  salt ", "", null, 2]"#)), vec!["salt", "2"]);
    }

    #[test]
    fn test_decode_non_list_json_falls_back_to_split() {
        assert_eq!(decode(Some("42")), vec!["42"]);
        assert_eq!(decode(Some("1.5,2")), vec!["1.5", "2"]);
    }

    #[test]
    fn test_decode_singleton_non_json_inner_string() {
        assert_eq!(decode(Some(r#"["[chopped] garlic"]"#)), vec!["[chopped] garlic"]);
    }

    #[test]
    fn test_decode_singleton_plain_string_is_terminal() {
        assert_eq!(decode(Some(r#"["one step"]"#)), vec!["one step"]);
    }

    #[test]
    fn test_decode_malformed_json_is_split() {
        assert_eq!(decode(Some(r#"["a","b""#)), vec![r#"["a""#, r#""b""#]);
    }
}
