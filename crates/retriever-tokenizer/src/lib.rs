//! Positional tokenizer and token normalizer (component C1 of the engine).
//!
//! Tokenization and normalization are split into two independent steps so
//! that the same [`normalize`] function can be applied both while indexing a
//! corpus and while reading a user's query, which is what keeps lookups
//! symmetric.

mod normalize;
mod stopwords;
mod token;

pub use normalize::{normalize, NormalizerConfig, Stemmer, SuffixStemmer};
pub use stopwords::StopWords;
pub use token::{Token, Tokenizer};
