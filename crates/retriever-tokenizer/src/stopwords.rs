use std::collections::BTreeSet;

/// A per-language stop-word table.
///
/// Holds normalized (lowercase) stop words in a `BTreeSet`, mirroring how
/// the teacher crate accumulates stop words before folding them into a
/// queryable set.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    pub fn new() -> StopWords {
        StopWords { words: BTreeSet::new() }
    }

    pub fn from_words<I, S>(words: I) -> StopWords
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopWords { words: words.into_iter().map(Into::into).collect() }
    }

    /// The default English stop-word list used when no corpus-specific
    /// table is supplied.
    pub fn english() -> StopWords {
        StopWords::from_words(ENGLISH_STOP_WORDS.iter().copied())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn insert(&mut self, word: impl Into<String>) {
        self.words.insert(word.into());
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is",
    "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
    "these", "they", "this", "to", "was", "will", "with",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_contains_common_words() {
        let stops = StopWords::english();
        assert!(stops.contains("the"));
        assert!(stops.contains("and"));
        assert!(!stops.contains("basketball"));
    }
}
