//! The inverted index (component C5): dictionary, by-document, and
//! phonetic maps, plus the permuterm trie, built once per corpus and
//! read-only thereafter (spec §3, §4.5, §5).

use std::collections::HashMap;

use rayon::prelude::*;
use retriever_tokenizer::{normalize, NormalizerConfig, Tokenizer};

use crate::document::{Document, DocumentIdentifier};
use crate::error::MResult;
use crate::permuterm::PermutermTrie;
use crate::posting::Posting;
use crate::skiplist::PostingList;
use crate::soundex::soundex;

/// A normalized token together with its aggregated posting list and
/// collection frequency (spec §3).
#[derive(Debug, Clone, Default)]
pub struct Term {
    pub word: String,
    pub postings: PostingList,
    pub collection_frequency: usize,
}

impl Term {
    fn merge(&mut self, postings: Vec<Posting>) {
        self.postings.add_all(postings);
        self.collection_frequency =
            self.postings.as_slice().iter().map(|p| p.positions.len()).sum();
    }
}

/// Invoked at bounded intervals during construction for observability only
/// (spec §4.5, §9): `(documents_processed, total_documents)`.
pub type ProgressCallback<'a> = dyn Fn(usize, usize) + Send + Sync + 'a;

#[derive(Default)]
pub struct InvertedIndex {
    dictionary: HashMap<String, Term>,
    by_doc: HashMap<DocumentIdentifier, Vec<Posting>>,
    phonetic: HashMap<String, Vec<String>>,
    permuterm: PermutermTrie,
    documents: HashMap<DocumentIdentifier, Document>,
}

/// A document's contribution to the index: its per-term position lists,
/// computed independently of every other document so that construction can
/// fan out across `rayon`'s thread pool (spec §5).
struct DocumentTerms {
    document_id: DocumentIdentifier,
    terms: HashMap<String, Vec<usize>>,
}

fn tokenize_document(document: &Document, config: &NormalizerConfig) -> DocumentTerms {
    let mut terms: HashMap<String, Vec<usize>> = HashMap::new();
    for token in Tokenizer::new(&document.indexable_text()) {
        if let Some(word) = normalize(token.word, false, config) {
            terms.entry(word).or_default().push(token.position);
        }
    }
    DocumentTerms { document_id: document.id, terms }
}

impl InvertedIndex {
    /// Builds an index over `documents`, tokenizing and normalizing each
    /// one in parallel and serializing the merge into the shared maps
    /// (spec §4.5, §5). `progress` is sampled once per document.
    pub fn build(
        documents: &[Document],
        config: &NormalizerConfig,
        progress: Option<&ProgressCallback>,
    ) -> MResult<InvertedIndex> {
        let total = documents.len();
        let partials: Vec<DocumentTerms> = documents
            .par_iter()
            .enumerate()
            .map(|(i, document)| {
                let partial = tokenize_document(document, config);
                if let Some(callback) = progress {
                    callback(i + 1, total);
                }
                partial
            })
            .collect();

        let mut index = InvertedIndex::default();
        for document in documents {
            index.documents.insert(document.id, document.clone());
        }

        for partial in partials {
            for (word, positions) in partial.terms {
                let posting = Posting::new(partial.document_id, positions);
                index.by_doc.entry(partial.document_id).or_default().push(posting.clone());
                index
                    .dictionary
                    .entry(word.clone())
                    .or_insert_with(|| Term { word, ..Term::default() })
                    .merge(vec![posting]);
            }
        }

        for word in index.dictionary.keys() {
            index.permuterm.insert(word);
            index.phonetic.entry(soundex(word)).or_default().push(word.clone());
        }

        Ok(index)
    }

    /// Resolves a (possibly wildcarded) token to its posting list. Missing
    /// tokens yield an empty list, never an error (spec §4.5, §7).
    pub fn postings_for(&self, token: &str) -> PostingList {
        if !token.contains('*') {
            return self.dictionary.get(token).map(|t| t.postings.clone()).unwrap_or_default();
        }

        let mut result = PostingList::new();
        for candidate in self.permuterm.wildcard_candidates(token) {
            if let Some(term) = self.dictionary.get(&candidate) {
                result = PostingList::union(&result, &term.postings);
            }
        }
        result
    }

    pub fn collection_frequency(&self, term: &str) -> usize {
        self.dictionary.get(term).map(|t| t.collection_frequency).unwrap_or(0)
    }

    pub fn postings_by_doc(&self, doc_id: DocumentIdentifier) -> &[Posting] {
        self.by_doc.get(&doc_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Terms stored under `soundex(word)`, deduplicated.
    pub fn soundex_candidates(&self, word: &str) -> Vec<String> {
        let mut terms = self.phonetic.get(&soundex(word)).cloned().unwrap_or_default();
        terms.sort_unstable();
        terms.dedup();
        terms
    }

    /// Prefix-lookup in the permuterm trie (spec §4.5
    /// `dictionary_terms_with_substring`). When `ignore_end_marker`, a
    /// trailing sentinel on `substring` is stripped before lookup, for
    /// callers (the speller) that build prefixes from unrotated words.
    pub fn dictionary_terms_with_substring(&self, substring: &str, ignore_end_marker: bool) -> Vec<String> {
        let trimmed = if ignore_end_marker {
            substring.trim_end_matches(crate::permuterm::END_MARKER)
        } else {
            substring
        };
        self.permuterm.prefix_lookup(trimmed)
    }

    pub fn all_doc_ids(&self) -> Vec<DocumentIdentifier> {
        let mut ids: Vec<DocumentIdentifier> = self.documents.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn document(&self, doc_id: DocumentIdentifier) -> Option<&Document> {
        self.documents.get(&doc_id)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.dictionary.contains_key(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentIdCounter;

    fn build_two_doc_corpus() -> InvertedIndex {
        let mut counter = DocumentIdCounter::new();
        let documents = vec![
            Document::new(
                counter.next_id().unwrap(),
                "Space Jam",
                "A basketball movie featuring Looney Tunes characters",
                "en",
            ),
            Document::new(
                counter.next_id().unwrap(),
                "Treasure Planet",
                "Jim Hawkins and Long John Silver sail the stars",
                "en",
            ),
        ];
        InvertedIndex::build(&documents, &NormalizerConfig::default(), None).unwrap()
    }

    #[test]
    fn postings_for_known_term() {
        let index = build_two_doc_corpus();
        assert_eq!(index.postings_for("space").len(), 1);
        assert_eq!(index.postings_for("nonexistent").len(), 0);
    }

    #[test]
    fn wildcard_unions_matching_terms() {
        let index = build_two_doc_corpus();
        assert_eq!(index.postings_for("sp*ce").len(), 1);
    }

    #[test]
    fn soundex_candidates_include_phonetic_matches() {
        let index = build_two_doc_corpus();
        let candidates = index.soundex_candidates("jam");
        assert!(candidates.contains(&"jam".to_string()));
    }

    #[test]
    fn all_doc_ids_are_sorted() {
        let index = build_two_doc_corpus();
        let ids = index.all_doc_ids();
        assert_eq!(ids.len(), 2);
        assert!(ids[0] < ids[1]);
    }
}
