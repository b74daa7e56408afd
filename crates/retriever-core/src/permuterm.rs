//! Permuterm trie (component C4): a prefix-searchable store of every
//! rotation of every dictionary term, used to resolve wildcard patterns and
//! to supply the rotation-based candidate lookups the spelling corrector
//! needs (spec §4.4).

use std::collections::HashMap;

/// The sentinel appended to every term before it is rotated. Normalization
/// only ever produces `[a-z0-9]` (plus `*` in query terms, which are never
/// themselves inserted into the trie), so this character can never collide
/// with a real term.
pub const END_MARKER: char = '\u{0}';

#[derive(Debug, Default)]
struct Node {
    children: HashMap<char, Node>,
    terms: Vec<String>,
}

#[derive(Debug, Default)]
pub struct PermutermTrie {
    root: Node,
}

impl PermutermTrie {
    /// Inserts every rotation of `term ⊕ END` into the trie, associating
    /// each with `term` (spec §4.4 build-time).
    pub fn insert(&mut self, term: &str) {
        for rotation in rotations(term) {
            let mut node = &mut self.root;
            for c in rotation.chars() {
                node = node.children.entry(c).or_default();
            }
            node.terms.push(term.to_string());
        }
    }

    /// All terms stored under a key that starts with `prefix` (spec §4.4
    /// `prefix_lookup`), as a multiset — a term can appear more than once
    /// if more than one of its rotations shares the prefix.
    pub fn prefix_lookup(&self, prefix: &str) -> Vec<String> {
        let mut node = &self.root;
        for c in prefix.chars() {
            match node.children.get(&c) {
                Some(next) => node = next,
                None => return Vec::new(),
            }
        }

        let mut out = Vec::new();
        collect(node, &mut out);
        out
    }

    /// Resolves a wildcard pattern (spec §4.4 steps 1–3): canonicalize,
    /// rotate the single remaining `*` to the tail, prefix-lookup, then
    /// filter candidates by re-matching the *original* pattern.
    pub fn wildcard_candidates(&self, pattern: &str) -> Vec<String> {
        let canonical = canonicalize(pattern);
        let chars: Vec<char> = canonical.chars().collect();
        let Some(star) = chars.iter().position(|&c| c == '*') else {
            // No wildcard at all: fall back to an exact rotation lookup.
            return self.prefix_lookup(&canonical).unique_sorted();
        };

        // `star` is a char index into `chars`, never a byte offset, so
        // multi-byte characters anywhere in `pattern` rotate correctly.
        let n = chars.len();
        let shift = (star + 1) % n;
        let rotated: Vec<char> = chars[shift..].iter().chain(chars[..shift].iter()).copied().collect();
        let lookup_key: String = rotated[..rotated.len() - 1].iter().collect(); // drop the trailing '*'

        let matcher = WildcardMatcher::new(pattern);
        self.prefix_lookup(&lookup_key)
            .unique_sorted()
            .into_iter()
            .filter(|candidate| matcher.is_match(candidate))
            .collect()
    }
}

fn collect(node: &Node, out: &mut Vec<String>) {
    out.extend(node.terms.iter().cloned());
    for child in node.children.values() {
        collect(child, out);
    }
}

/// Every cyclic rotation of `term ⊕ END`, one per starting offset.
fn rotations(term: &str) -> Vec<String> {
    let mut padded: Vec<char> = term.chars().collect();
    padded.push(END_MARKER);
    let n = padded.len();

    (0..n)
        .map(|i| padded[i..].iter().chain(padded[..i].iter()).collect())
        .collect()
}

/// Collapses everything between the first and last `*` of `pattern` into a
/// single `*`, then appends the end marker (spec §4.4 step 1).
fn canonicalize(pattern: &str) -> String {
    let first = pattern.find('*');
    let last = pattern.rfind('*');

    let folded = match (first, last) {
        (Some(f), Some(l)) if f != l => {
            format!("{}*{}", &pattern[..f], &pattern[l + 1..])
        }
        _ => pattern.to_string(),
    };

    format!("{folded}{END_MARKER}")
}

/// Matches a wildcard pattern (`*` = any run of characters, including
/// none) against a literal string, using standard wildcard-to-regex
/// semantics: every `*` becomes `.*`, everything else is escaped.
struct WildcardMatcher {
    regex: regex::Regex,
}

impl WildcardMatcher {
    fn new(pattern: &str) -> WildcardMatcher {
        let mut expr = String::from("(?i)^");
        for part in pattern.split('*') {
            expr.push_str(&regex::escape(part));
            expr.push_str(".*");
        }
        // `split` leaves one trailing ".*" too many; strip it back off.
        expr.truncate(expr.len() - 2);
        expr.push('$');

        let regex = regex::Regex::new(&expr).unwrap_or_else(|_| regex::Regex::new("^$").unwrap());
        WildcardMatcher { regex }
    }

    fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

trait UniqueSorted {
    fn unique_sorted(self) -> Vec<String>;
}

impl UniqueSorted for Vec<String> {
    fn unique_sorted(mut self) -> Vec<String> {
        self.sort_unstable();
        self.dedup();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permuterm_completeness() {
        let mut trie = PermutermTrie::default();
        trie.insert("space");

        for rotation in rotations("space") {
            let found = trie.prefix_lookup(&rotation);
            assert!(found.contains(&"space".to_string()), "rotation {rotation:?} not found");
        }
    }

    #[test]
    fn wildcard_resolves_middle_star() {
        let mut trie = PermutermTrie::default();
        trie.insert("space");
        trie.insert("spice");
        trie.insert("stage");

        let mut hits = trie.wildcard_candidates("sp*ce");
        hits.sort();
        assert_eq!(hits, vec!["space".to_string(), "spice".to_string()]);
    }

    #[test]
    fn wildcard_with_prefix_only() {
        let mut trie = PermutermTrie::default();
        trie.insert("space");
        trie.insert("spice");
        trie.insert("stage");

        let mut hits = trie.wildcard_candidates("sp*");
        hits.sort();
        assert_eq!(hits, vec!["space".to_string(), "spice".to_string()]);
    }

    #[test]
    fn multiple_wildcards_fold_to_one() {
        let mut trie = PermutermTrie::default();
        trie.insert("space");

        let hits = trie.wildcard_candidates("sp*c*e");
        assert_eq!(hits, vec!["space".to_string()]);
    }

    #[test]
    fn multibyte_prefix_before_wildcard_resolves_correctly() {
        // A multi-byte character before the '*' used to desync the byte
        // offset from `find('*')` against the char-indexed rotation
        // buffer, rotating at the wrong position (or panicking).
        let mut trie = PermutermTrie::default();
        trie.insert("café_oeuf");
        trie.insert("unrelated");

        let hits = trie.wildcard_candidates("café*euf");
        assert_eq!(hits, vec!["café_oeuf".to_string()]);
    }

    proptest::proptest! {
        #[test]
        fn every_rotation_is_found(term in "[a-z]{1,12}") {
            let mut trie = PermutermTrie::default();
            trie.insert(&term);
            for rotation in rotations(&term) {
                proptest::prop_assert!(trie.prefix_lookup(&rotation).contains(&term));
            }
        }
    }
}
