use std::fmt;

use unicode_segmentation::UnicodeSegmentation;

/// Trimmed search text captured when a lookup is dispatched.
///
/// Queries compare by value: a completed lookup is only delivered while its
/// captured query still equals the coordinator's live query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    pub fn new(text: &str) -> Self {
        Self(text.trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in user-perceived characters (extended grapheme clusters).
    pub fn len(&self) -> usize {
        self.0.graphemes(true).count()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(Query::new("  bmw \t"), Query::new("bmw"));
        assert!(Query::new("   ").is_empty());
    }

    #[test]
    fn length_counts_graphemes() {
        assert_eq!(Query::new("toyo").len(), 4);
        assert_eq!(Query::new("e\u{301}t").len(), 2);
        assert_eq!(Query::new("日本").len(), 2);
    }
}
