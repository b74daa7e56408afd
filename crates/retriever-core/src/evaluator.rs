//! Evaluator (component C9): walks a DNF expression tree against the
//! index, producing an ordered, deduplicated document list (spec §4.9).

use retriever_tokenizer::{normalize, NormalizerConfig};

use crate::document::{Document, DocumentIdentifier};
use crate::error::{Error, MResult};
use crate::expression::{BinaryOp, Expression, UnaryOp};
use crate::index::InvertedIndex;
use crate::skiplist::PostingList;

/// Evaluates `expr` (already in DNF) against `index`, returning documents
/// in natural document order with duplicates removed (spec §4.9 final
/// step).
pub fn retrieve(expr: &Expression, index: &InvertedIndex, config: &NormalizerConfig) -> MResult<Vec<Document>> {
    let postings = eval(expr, index, config)?;
    let mut ids: Vec<DocumentIdentifier> = postings.as_slice().iter().map(|p| p.document_id).collect();
    ids.sort_unstable();
    ids.dedup();
    Ok(ids.into_iter().filter_map(|id| index.document(id).cloned()).collect())
}

fn eval(expr: &Expression, index: &InvertedIndex, config: &NormalizerConfig) -> MResult<PostingList> {
    match expr {
        Expression::Value(word) => {
            let normalized = normalize(word, true, config).unwrap_or_default();
            Ok(index.postings_for(&normalized))
        }
        Expression::Phrase { words, gaps } => eval_phrase(words, gaps, index, config),
        Expression::Unary { op: UnaryOp::Identity, child } => eval(child, index, config),
        Expression::Unary { op: UnaryOp::Not, child } => eval_not(child, index, config),
        Expression::Binary { op: BinaryOp::And, left, right } => {
            let (l, r) = order_by_cost(left, right, index, config);
            Ok(PostingList::intersect(&eval(l, index, config)?, &eval(r, index, config)?))
        }
        Expression::Binary { op: BinaryOp::Or, left, right } => {
            Ok(PostingList::union(&eval(left, index, config)?, &eval(right, index, config)?))
        }
    }
}

/// `NOT` over a value or phrase is well-defined: the complement of its
/// posting set within the whole corpus (spec §9 open question, resolved
/// as `NOT e ≡ all_docs ∖ eval(e)`). `NOT` directly over AND/OR is
/// unreachable once the tree has been normalized to DNF, since De Morgan
/// pushes every negation down to a leaf; if one somehow survives, that is
/// an internal invariant violation, not a silently-wrong answer.
fn eval_not(child: &Expression, index: &InvertedIndex, config: &NormalizerConfig) -> MResult<PostingList> {
    match child {
        Expression::Binary { .. } => Err(Error::InternalInvariantViolation(
            "NOT applied directly to AND/OR after DNF normalization".to_string(),
        )),
        _ => {
            let matched = eval(child, index, config)?;
            let all: Vec<_> = index
                .all_doc_ids()
                .into_iter()
                .map(|id| crate::posting::Posting::new(id, Vec::new()))
                .collect();
            let all = PostingList::from_sorted_unique(all);
            Ok(PostingList::difference(&all, &matched))
        }
    }
}

/// Joins the posting lists of a phrase's words positionally, chaining
/// `positional_join` left to right. Wildcard words fan out through the
/// index's own wildcard resolution in `postings_for` (spec §4.9).
fn eval_phrase(
    words: &[String],
    gaps: &[usize],
    index: &InvertedIndex,
    config: &NormalizerConfig,
) -> MResult<PostingList> {
    if words.is_empty() {
        return Ok(PostingList::new());
    }

    let normalized_words: Vec<String> =
        words.iter().map(|w| normalize(w, true, config).unwrap_or_default()).collect();

    let mut acc = index.postings_for(&normalized_words[0]);
    for (word, &gap) in normalized_words[1..].iter().zip(gaps.iter()) {
        let next = index.postings_for(word);
        acc = PostingList::positional_join(&acc, &next, gap);
    }
    Ok(acc)
}

/// Orders AND operands by estimated posting-list size, cheapest first
/// (spec §4.9 optimization), so intersection dominates over the smaller
/// list as early as possible.
fn order_by_cost<'a>(
    left: &'a Expression,
    right: &'a Expression,
    index: &InvertedIndex,
    config: &NormalizerConfig,
) -> (&'a Expression, &'a Expression) {
    if estimate_cost(left, index, config) <= estimate_cost(right, index, config) {
        (left, right)
    } else {
        (right, left)
    }
}

fn estimate_cost(expr: &Expression, index: &InvertedIndex, config: &NormalizerConfig) -> usize {
    match expr {
        Expression::Value(word) => {
            let normalized = normalize(word, true, config).unwrap_or_default();
            index.collection_frequency(&normalized)
        }
        Expression::Phrase { words, .. } => words
            .first()
            .and_then(|w| normalize(w, true, config))
            .map(|w| index.collection_frequency(&w))
            .unwrap_or(0),
        Expression::Unary { child, .. } => estimate_cost(child, index, config),
        Expression::Binary { left, right, .. } => {
            estimate_cost(left, index, config) + estimate_cost(right, index, config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentIdCounter;
    use crate::parser::parse;

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
        InvertedIndex::build(&documents, &NormalizerConfig::default(), None).unwrap()
    }

    fn titles(docs: &[Document]) -> Vec<String> {
        docs.iter().map(|d| d.title.clone()).collect()
    }

    #[test]
    fn and_query_matches_space_jam() {
        let index = sample_index();
        let expr = parse("space & jam").unwrap();
        let docs = retrieve(&expr, &index, &NormalizerConfig::default()).unwrap();
        assert!(titles(&docs).contains(&"Space Jam".to_string()));
    }

    #[test]
    fn phrase_query_matches_space_jam() {
        let index = sample_index();
        let expr = parse("\"Space Jam\"").unwrap();
        let docs = retrieve(&expr, &index, &NormalizerConfig::default()).unwrap();
        assert!(titles(&docs).contains(&"Space Jam".to_string()));
    }

    #[test]
    fn not_excludes_matching_documents() {
        let index = sample_index();
        let expr = parse("space & !jam").unwrap();
        let docs = retrieve(&expr, &index, &NormalizerConfig::default()).unwrap();
        assert!(!titles(&docs).contains(&"Space Jam".to_string()));
    }

    #[test]
    fn wildcard_phrase_matches_space_jam() {
        let index = sample_index();
        let expr = parse("\"Sp*ce *am\"").unwrap();
        let docs = retrieve(&expr, &index, &NormalizerConfig::default()).unwrap();
        assert!(titles(&docs).contains(&"Space Jam".to_string()));
    }

    #[test]
    fn not_involution() {
        let index = sample_index();
        let config = NormalizerConfig::default();
        let e = parse("space").unwrap();
        let not_not = Expression::negate(Expression::negate(e.clone())).to_dnf();
        let a = retrieve(&e, &index, &config).unwrap();
        let b = retrieve(&not_not, &index, &config).unwrap();
        assert_eq!(titles(&a), titles(&b));
    }

    #[test]
    fn de_morgan_over_and() {
        let index = sample_index();
        let config = NormalizerConfig::default();
        let a = parse("!( space & jam )").unwrap();
        let b = parse("!space | !jam").unwrap();
        let docs_a = retrieve(&a, &index, &config).unwrap();
        let docs_b = retrieve(&b, &index, &config).unwrap();
        assert_eq!(titles(&docs_a), titles(&docs_b));
    }
}
