//! Boolean information-retrieval engine core: inverted index, skip-list
//! postings, permuterm trie, spelling/phonetic correction, and boolean
//! query evaluation.
//!
//! The public surface is deliberately small: build an index once from a
//! corpus, then retrieve against it. Query parsing, DNF normalization, and
//! evaluation all happen behind [`retrieve`].

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

mod corrector;
mod document;
mod error;
mod evaluator;
mod expression;
mod index;
mod parser;
mod permuterm;
mod posting;
mod skiplist;
mod soundex;

pub use corrector::{Corrector, CorrectorConfig, Mode as CorrectorMode};
pub use document::{Document, DocumentIdCounter, DocumentIdentifier};
pub use error::{Error, MResult};
pub use expression::{BinaryOp, Expression, UnaryOp};
pub use index::{InvertedIndex, ProgressCallback, Term};
pub use posting::Posting;
pub use skiplist::PostingList;

use retriever_tokenizer::NormalizerConfig;

/// Builds an index over `documents` (spec §4.5, §6 `build_index`). The
/// only failure mode is document-id exhaustion, which can only happen
/// before this call if the corpus itself was assembled from an exhausted
/// [`DocumentIdCounter`]; construction itself never allocates ids.
pub fn build_index(
    documents: &[Document],
    config: &NormalizerConfig,
    progress: Option<&ProgressCallback>,
) -> MResult<InvertedIndex> {
    InvertedIndex::build(documents, config, progress)
}

/// Parses, DNF-normalizes, and evaluates `query` against `index`, in
/// natural document order with duplicates removed (spec §6 `retrieve`).
/// A blank or syntactically invalid query yields an empty result, never
/// an error — the parse failure is still logged for diagnostics.
pub fn retrieve(query: &str, index: &InvertedIndex, config: &NormalizerConfig) -> Vec<Document> {
    match parser::parse(query) {
        Ok(expr) => match evaluator::retrieve(&expr, index, config) {
            Ok(docs) => docs,
            Err(err) => {
                log::warn!("evaluation of {query:?} failed: {err}");
                Vec::new()
            }
        },
        Err(err) => {
            log::debug!("query {query:?} did not parse: {err}");
            Vec::new()
        }
    }
}

/// An empty expression builder (spec §6 `create_expression`), for callers
/// assembling a query tree programmatically instead of through
/// [`parser::parse`]'s text grammar.
#[derive(Debug, Default)]
pub struct ExpressionBuilder {
    expr: Option<Expression>,
}

impl ExpressionBuilder {
    pub fn new() -> ExpressionBuilder {
        ExpressionBuilder::default()
    }

    pub fn value(mut self, word: impl Into<String>) -> ExpressionBuilder {
        self.expr = Some(self.combine(Expression::value(word)));
        self
    }

    pub fn phrase(mut self, words: Vec<String>) -> ExpressionBuilder {
        self.expr = Some(self.combine(Expression::phrase(words)));
        self
    }

    pub fn and(mut self, other: Expression) -> ExpressionBuilder {
        let combined = match self.expr.take() {
            Some(existing) => Expression::and(existing, other),
            None => other,
        };
        self.expr = Some(combined);
        self
    }

    pub fn or(mut self, other: Expression) -> ExpressionBuilder {
        let combined = match self.expr.take() {
            Some(existing) => Expression::or(existing, other),
            None => other,
        };
        self.expr = Some(combined);
        self
    }

    pub fn negate(mut self) -> ExpressionBuilder {
        if let Some(existing) = self.expr.take() {
            self.expr = Some(Expression::negate(existing));
        }
        self
    }

    /// Finalizes the tree, running DNF normalization (spec §4.6).
    pub fn build(self) -> Option<Expression> {
        self.expr.map(|e| e.to_dnf())
    }

    fn combine(&mut self, leaf: Expression) -> Expression {
        match self.expr.take() {
            Some(existing) => Expression::and(existing, leaf),
            None => leaf,
        }
    }
}

pub fn postings_for_token(index: &InvertedIndex, token: &str) -> PostingList {
    index.postings_for(token)
}

pub fn collection_frequency(index: &InvertedIndex, term: &str) -> usize {
    index.collection_frequency(term)
}

pub fn soundex_candidates(index: &InvertedIndex, word: &str) -> Vec<String> {
    index.soundex_candidates(word)
}

pub fn all_doc_ids(index: &InvertedIndex) -> Vec<DocumentIdentifier> {
    index.all_doc_ids()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> InvertedIndex {
        let mut counter = DocumentIdCounter::new();
        let documents = vec![
            Document::new(
                counter.next_id().unwrap(),
                "Space Jam",
                "a basketball movie featuring looney tunes characters",
                "en",
            ),
            Document::new(
                counter.next_id().unwrap(),
                "Treasure Planet",
                "jim hawkins and long john silver sail the stars",
                "en",
            ),
        ];
        build_index(&documents, &NormalizerConfig::default(), None).unwrap()
    }

    #[test]
    fn retrieve_never_errors_on_blank_query() {
        let index = sample_index();
        let docs = retrieve("", &index, &NormalizerConfig::default());
        assert!(docs.is_empty());
    }

    #[test]
    fn retrieve_finds_space_jam() {
        let index = sample_index();
        let docs = retrieve("space & jam", &index, &NormalizerConfig::default());
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "Space Jam");
    }

    #[test]
    fn expression_builder_assembles_and_normalizes() {
        let expr = ExpressionBuilder::new()
            .value("space")
            .and(Expression::negate(Expression::value("jam")))
            .build()
            .unwrap();
        assert_eq!(expr.to_query_string(), "space&!jam");
    }

    #[test]
    fn all_doc_ids_matches_document_count() {
        let index = sample_index();
        assert_eq!(all_doc_ids(&index).len(), index.document_count());
    }
}
