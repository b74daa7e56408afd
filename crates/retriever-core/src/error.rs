use thiserror::Error;

/// The error taxonomy of the engine (spec §7).
///
/// `InvalidQuery` and per-word correction misses are deliberately *not*
/// constructed by [`crate::retrieve`]: a malformed query string degrades to
/// an empty result set rather than an error. This type exists for the paths
/// that really do need to abort — corpus construction exhausting its
/// identifier space, and the handful of invariants the evaluator relies on
/// holding.
#[derive(Debug, Error)]
pub enum Error {
    /// The bounded document-identifier counter has no more values to hand
    /// out. Fatal to corpus construction.
    #[error("document identifier space exhausted; corpus construction aborted")]
    CorpusExhausted,

    /// A query string failed to parse into an expression tree. Never
    /// surfaces through the public `retrieve` API, which maps it to an
    /// empty result set instead; kept for callers that parse queries
    /// directly.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A combination of operators this engine deliberately leaves
    /// undefined, e.g. negating a phrase under a policy that was never
    /// implemented.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// An internal invariant was violated (e.g. an out-of-range posting
    /// list access, or an unexpected node shape after DNF normalization).
    /// Never retried.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

pub type MResult<T> = Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_exhausted_is_fatal_and_distinct() {
        let err: MResult<()> = Err(Error::CorpusExhausted);
        assert_matches!(err, Err(Error::CorpusExhausted));
    }

    #[test]
    fn invalid_query_carries_its_message() {
        let err = Error::InvalidQuery("blank query".to_string());
        assert_matches!(err, Error::InvalidQuery(msg) if msg == "blank query");
    }
}
