//! Merging of the two disease tag sources into one display list.
//!
//! A recipe carries a category tag (a disease id, resolved to its name) and a
//! free-text tag field typed in at creation time. The two overlap, often with
//! different spelling or decoration ("Diabetes", "disease: diabetes"), so the
//! free-text names are only kept when no existing entry already represents them.

use crate::services::list_field;

/// Tag-name equivalences beyond plain case-insensitive containment.
///
/// This is a hand-maintained table. Names outside it that describe the same
/// condition in different wording are not merged.
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymTable {
    /// Decorations meaning "disease of", folded
    prefixes: Vec<String>,
    /// `(decorated, bare)` pairs, folded, matched in both directions
    pairs: Vec<(String, String)>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::new(Self::default_prefixes(), Vec::new())
    }
}

impl SynonymTable {
    pub fn new(prefixes: Vec<String>, pairs: Vec<(String, String)>) -> Self {
        let prefixes = prefixes
            .iter()
            .map(|p| fold(p))
            .filter(|p| !p.is_empty())
            .collect();
        let pairs = pairs
            .iter()
            .map(|(decorated, bare)| (fold(decorated), fold(bare)))
            .filter(|(decorated, bare)| !decorated.is_empty() && !bare.is_empty())
            .collect();
        Self { prefixes, pairs }
    }

    /// Thai "โรค" plus the English decorations seen in free-text tags
    pub fn default_prefixes() -> Vec<String> {
        ["โรค", "disease:", "disease of", "disease-of-"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn strip_prefix<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.prefixes
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix.as_str()))
            .map(str::trim)
    }

    fn paired(&self, a: &str, b: &str) -> bool {
        self.pairs
            .iter()
            .any(|(decorated, bare)| (a == decorated && b == bare) || (a == bare && b == decorated))
    }

    /// Whether two tag names denote the same condition
    pub fn is_duplicate(&self, a: &str, b: &str) -> bool {
        let a = fold(a);
        let b = fold(b);
        if a.is_empty() || b.is_empty() {
            return a == b;
        }

        a == b
            || a.contains(&b)
            || b.contains(&a)
            || self.strip_prefix(&a) == Some(b.as_str())
            || self.strip_prefix(&b) == Some(a.as_str())
            || self.paired(&a, &b)
    }
}

/// Lower-cases and collapses runs of whitespace
fn fold(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Splits a comma separated free-text tag field
pub fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Merges category names and free-text names into one ordered, duplicate-free list
#[derive(Debug, Clone, Default)]
pub struct TagNormalizer {
    synonyms: SynonymTable,
}

impl TagNormalizer {
    pub fn new(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Category names come first, verbatim; a free-text name is appended only
    /// when nothing already present matches it.
    pub fn merge<C, F>(&self, category_names: C, free_text_names: F) -> Vec<String>
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        let mut merged: Vec<String> = Vec::new();

        for name in category_names {
            let name = name.as_ref().trim();
            if name.is_empty() || merged.iter().any(|m| fold(m) == fold(name)) {
                continue;
            }
            merged.push(name.to_string());
        }

        for name in free_text_names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if merged.iter().any(|m| self.synonyms.is_duplicate(m, name)) {
                tracing::trace!(tag = %name, "Dropping duplicate tag");
                continue;
            }
            merged.push(name.to_string());
        }

        merged
    }

    /// Merges a resolved category name with a raw free-text tag field
    pub fn merge_recipe_tags(&self, category_name: Option<&str>, raw_tags: Option<&str>) -> Vec<String> {
        self.merge(category_name, split_tags(raw_tags))
    }
}

/// Member interests: decoded leniently and de-duplicated case-insensitively
pub fn decode_interests(raw: Option<&str>) -> Vec<String> {
    let mut interests: Vec<String> = Vec::new();
    for name in list_field::decode(raw) {
        if !interests.iter().any(|i| fold(i) == fold(&name)) {
            interests.push(name);
        }
    }
    interests
}
