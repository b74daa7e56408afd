use crate::stopwords::StopWords;
use strip::strip_disallowed;

/// A pluggable word stemmer, applied as the last normalization step.
///
/// The default configuration carries no stemmer (`normalize` skips step 5
/// entirely), matching spec: stemming is optional.
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// A small suffix-stripping stemmer for English, in the spirit of a
/// simplified Porter stemmer. Good enough to fold "basketballs" and
/// "basketball" to the same term without pulling in a dedicated crate for
/// it.
pub struct SuffixStemmer;

impl Stemmer for SuffixStemmer {
    fn stem(&self, word: &str) -> String {
        const SUFFIXES: &[&str] = &["ational", "ization", "fulness", "ing", "edly", "ies", "ed", "es", "s"];
        for suffix in SUFFIXES {
            if word.len() > suffix.len() + 2 && word.ends_with(suffix) {
                return word[..word.len() - suffix.len()].to_string();
            }
        }
        word.to_string()
    }
}

/// Tunables for [`normalize`], carried by value rather than through global
/// state: the caller (corpus builder or query parser) decides language and
/// behavior per call.
pub struct NormalizerConfig<'a> {
    pub language: &'a str,
    pub stop_words: Option<&'a StopWords>,
    pub stemmer: Option<&'a dyn Stemmer>,
}

impl<'a> Default for NormalizerConfig<'a> {
    fn default() -> Self {
        NormalizerConfig { language: "en", stop_words: None, stemmer: None }
    }
}

/// Applies the five-step normalization contract shared by indexing and
/// querying:
///
/// 1. strip characters outside `[A-Za-z0-9 ]` (and `*`, only for queries)
/// 2. collapse whitespace runs, trim
/// 3. lowercase (locale-independent)
/// 4. drop stop words
/// 5. stem, dropping empty results
///
/// Returns `None` when the token carries no indexable/queryable content
/// after any of these steps; this is not an error, just an empty
/// contribution (spec §7).
pub fn normalize(token: &str, for_query: bool, config: &NormalizerConfig) -> Option<String> {
    let folded = deunicode::deunicode_with_tofu(token, "");
    let stripped = strip_disallowed(&folded, for_query);

    let collapsed = collapse_whitespace(&stripped);
    if collapsed.is_empty() {
        return None;
    }

    let lowered = lowercase_ascii(&collapsed);

    if let Some(stop_words) = config.stop_words {
        if stop_words.contains(&lowered) {
            return None;
        }
    }

    let stemmed = match config.stemmer {
        Some(stemmer) => stemmer.stem(&lowered),
        None => lowered,
    };

    if stemmed.is_empty() {
        None
    } else {
        Some(stemmed)
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = false;
    for c in s.trim().chars() {
        if c == ' ' {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

/// Locale-independent lowercasing: a fixed ASCII mapping rather than
/// `str::to_lowercase`, which is sensitive to the active Unicode tables and
/// would make indexing and query-time normalization diverge across builds.
fn lowercase_ascii(s: &str) -> String {
    s.chars().map(|c| c.to_ascii_lowercase()).collect()
}

mod strip {
    /// Strips every character not matching `[A-Za-z0-9 ]`, or
    /// `[A-Za-z0-9 *]` when normalizing a query term (the wildcard
    /// exemption of spec §4.1 step 1).
    pub fn strip_disallowed(s: &str, for_query: bool) -> String {
        s.chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || (for_query && *c == '*'))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_and_lowercases() {
        let config = NormalizerConfig::default();
        assert_eq!(normalize("  Space!!  ", false, &config), Some("space".to_string()));
    }

    #[test]
    fn keeps_wildcard_only_for_queries() {
        let config = NormalizerConfig::default();
        assert_eq!(normalize("sp*ce", true, &config), Some("sp*ce".to_string()));
        assert_eq!(normalize("sp*ce", false, &config), Some("spce".to_string()));
    }

    #[test]
    fn drops_stop_words() {
        let stop_words = StopWords::english();
        let config = NormalizerConfig { stop_words: Some(&stop_words), ..Default::default() };
        assert_eq!(normalize("the", false, &config), None);
        assert_eq!(normalize("basketball", false, &config), Some("basketball".to_string()));
    }

    #[test]
    fn stemmer_can_empty_a_word() {
        struct EmptyStemmer;
        impl Stemmer for EmptyStemmer {
            fn stem(&self, _word: &str) -> String {
                String::new()
            }
        }
        let stemmer = EmptyStemmer;
        let config = NormalizerConfig { stemmer: Some(&stemmer), ..Default::default() };
        assert_eq!(normalize("anything", false, &config), None);
    }

    #[test]
    fn deunicode_folds_accents_before_stripping() {
        let config = NormalizerConfig::default();
        assert_eq!(normalize("café", false, &config), Some("cafe".to_string()));
    }
}
