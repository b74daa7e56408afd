use crate::error::{Error, MResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A totally ordered document key, drawn from a bounded counter that starts
/// at the minimum of its integer domain and increments on every allocation
/// (spec §3). Exhaustion of the counter is a terminal failure of corpus
/// construction, not of any individual query.
#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentIdentifier(i64);

impl DocumentIdentifier {
    /// Exposed so the evaluator and tests can construct identifiers without
    /// going through a counter. Indexing always allocates through
    /// [`DocumentIdCounter`].
    pub fn new(value: i64) -> DocumentIdentifier {
        DocumentIdentifier(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocumentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates [`DocumentIdentifier`]s in strictly increasing order starting
/// at `i64::MIN`, per spec §3.
pub struct DocumentIdCounter {
    next: Option<i64>,
}

impl DocumentIdCounter {
    pub fn new() -> DocumentIdCounter {
        DocumentIdCounter { next: Some(i64::MIN) }
    }

    /// For tests of the exhaustion failure mode, which would otherwise need
    /// to allocate `2^64` identifiers.
    pub fn starting_at(value: i64) -> DocumentIdCounter {
        DocumentIdCounter { next: Some(value) }
    }

    pub fn next_id(&mut self) -> MResult<DocumentIdentifier> {
        let current = self.next.ok_or(Error::CorpusExhausted)?;
        self.next = current.checked_add(1);
        Ok(DocumentIdentifier(current))
    }
}

impl Default for DocumentIdCounter {
    fn default() -> Self {
        DocumentIdCounter::new()
    }
}

/// A unit of retrieval. Immutable once registered with the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentIdentifier,
    pub title: String,
    pub content: String,
    pub language: String,
}

impl Document {
    pub fn new(
        id: DocumentIdentifier,
        title: impl Into<String>,
        content: impl Into<String>,
        language: impl Into<String>,
    ) -> Document {
        Document { id, title: title.into(), content: content.into(), language: language.into() }
    }

    /// Title and content concatenated, the text the indexer tokenizes
    /// (spec §4.5 construction step 1).
    pub fn indexable_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_allocates_in_increasing_order() {
        let mut counter = DocumentIdCounter::new();
        let a = counter.next_id().unwrap();
        let b = counter.next_id().unwrap();
        assert!(a < b);
    }

    #[test]
    fn counter_exhaustion_is_terminal() {
        let mut counter = DocumentIdCounter::starting_at(i64::MAX);
        assert!(counter.next_id().is_ok());
        assert!(matches!(counter.next_id(), Err(Error::CorpusExhausted)));
    }
}
