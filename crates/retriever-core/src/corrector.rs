//! Spelling/phonetic corrector (component C8): combinatorial rewriting of
//! a query phrase under edit-distance or Soundex correction (spec §4.8).

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::index::InvertedIndex;
use crate::permuterm::END_MARKER;

/// Characters dropped from the tail of each rotation before it is used as
/// a permuterm prefix query (spec §4.8, default per spec §9 open question).
const DEFAULT_SUFFIX_LENGTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    EditDistance,
    Phonetic { ignore_edit_distance: bool },
}

/// Tunables for [`Corrector`] (spec §9 open questions: suffix length is a
/// tunable defaulting to 2; whether edit-distance filtering runs under
/// phonetic mode is exposed as `ignore_edit_distance`).
#[derive(Debug, Clone, Copy)]
pub struct CorrectorConfig {
    pub suffix_length: usize,
    pub mode: Mode,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        CorrectorConfig { suffix_length: DEFAULT_SUFFIX_LENGTH, mode: Mode::EditDistance }
    }
}

/// Drives `next_batch` over an original phrase, caching per-word candidate
/// lists by distance so repeated target-distance increases reuse earlier
/// lookups (spec §4.8).
pub struct Corrector<'a> {
    index: &'a InvertedIndex,
    words: Vec<String>,
    config: CorrectorConfig,
    target_distance: i64,
    stopped: bool,
    caches: Vec<HashMap<usize, Vec<String>>>,
}

impl<'a> Corrector<'a> {
    pub fn new(index: &'a InvertedIndex, words: Vec<String>, config: CorrectorConfig) -> Corrector<'a> {
        let caches = vec![HashMap::new(); words.len()];
        Corrector { index, words, config, target_distance: -1, stopped: false, caches }
    }

    /// Permanently stops further batches (spec §4.8 `stop()`).
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Produces the next batch of candidate phrases at the next overall
    /// target distance, or an empty vector once no further candidates
    /// exist or the corrector has been stopped (spec §4.8).
    pub fn next_batch(&mut self) -> Vec<Vec<String>> {
        if self.stopped || self.words.is_empty() {
            return Vec::new();
        }

        if let Mode::Phonetic { ignore_edit_distance: true } = self.config.mode {
            self.stopped = true;
            let per_word: Vec<Vec<String>> =
                self.words.iter().map(|w| self.index.soundex_candidates(w)).collect();
            return cartesian_product(&per_word);
        }

        loop {
            self.target_distance += 1;
            let d = self.target_distance as usize;

            for (i, word) in self.words.clone().iter().enumerate() {
                self.ensure_cached(i, word);
            }

            // Every integer tuple (d_1, .., d_k) with d_i >= 0 and sum == D
            // (spec §4.8 step 2): each tuple whose every slot has at least
            // one candidate contributes the Cartesian product of those
            // per-word candidate lists to this batch.
            let mut phrases = Vec::new();
            for tuple in compositions(d, self.words.len()) {
                let per_word: Vec<Vec<String>> = tuple
                    .iter()
                    .enumerate()
                    .map(|(i, &d_i)| self.caches[i].get(&d_i).cloned().unwrap_or_default())
                    .collect();
                if per_word.iter().all(|c| !c.is_empty()) {
                    phrases.extend(cartesian_product(&per_word));
                }
            }

            if !phrases.is_empty() {
                return phrases;
            }

            let any_candidate_at_or_above_d =
                self.caches.iter().any(|c| c.keys().any(|&k| k >= d));
            if !any_candidate_at_or_above_d {
                self.stopped = true;
                return Vec::new();
            }
        }
    }

    fn ensure_cached(&mut self, i: usize, word: &str) {
        if !self.caches[i].is_empty() {
            return;
        }
        let by_distance = match self.config.mode {
            Mode::EditDistance => self.edit_distance_candidates(word),
            Mode::Phonetic { .. } => self.phonetic_candidates(word),
        };
        self.caches[i] = by_distance;
    }

    /// Rotation-based candidate generation (spec §4.8 per-word edit
    /// distance): every rotation of `word ⊕ END`, truncated by
    /// `suffix_length`, used as a permuterm prefix query, plus a direct
    /// lookup on `word` itself — not yet rotated — for corrections that
    /// share a literal prefix with it (spec §4.5's `ignore_end_marker`).
    fn edit_distance_candidates(&self, word: &str) -> HashMap<usize, Vec<String>> {
        let mut candidates: Vec<String> = Vec::new();

        let unrotated = format!("{word}{END_MARKER}");
        candidates.extend(self.index.dictionary_terms_with_substring(&unrotated, true));

        for rotation in rotations(word) {
            if rotation.chars().count() <= self.config.suffix_length {
                continue;
            }
            let cut = rotation.chars().count() - self.config.suffix_length;
            let prefix: String = rotation.chars().take(cut).collect();
            candidates.extend(self.index.dictionary_terms_with_substring(&prefix, false));
        }
        candidates.sort_unstable();
        candidates.dedup();

        group_by_distance(word, candidates, self.index)
    }

    /// Soundex-based candidate generation (spec §4.8): look up
    /// `soundex(word)` directly, then group by edit distance unless the
    /// corrector is configured to ignore edit-distance filtering.
    fn phonetic_candidates(&self, word: &str) -> HashMap<usize, Vec<String>> {
        let candidates = self.index.soundex_candidates(word);
        group_by_distance(word, candidates, self.index)
    }
}

fn group_by_distance(
    word: &str,
    candidates: Vec<String>,
    index: &InvertedIndex,
) -> HashMap<usize, Vec<String>> {
    let mut by_distance: HashMap<usize, Vec<String>> = HashMap::new();
    for candidate in candidates {
        let d = edit_distance(word, &candidate);
        by_distance.entry(d).or_default().push(candidate);
    }
    for group in by_distance.values_mut() {
        group.sort_by(|a, b| compare_candidates(a, b, index));
    }
    by_distance
}

/// Tie-break among equal-distance candidates (spec §4.8, §9 open
/// question): higher collection frequency first (the more common term is
/// the likelier intended word), falling back to alphabetic order for
/// full determinism when frequencies tie too.
fn compare_candidates(a: &str, b: &str, index: &InvertedIndex) -> Ordering {
    index.collection_frequency(b).cmp(&index.collection_frequency(a)).then_with(|| a.cmp(b))
}

fn rotations(word: &str) -> Vec<String> {
    let mut padded: Vec<char> = word.chars().collect();
    padded.push(END_MARKER);
    let n = padded.len();
    (0..n).map(|i| padded[i..].iter().chain(padded[..i].iter()).collect()).collect()
}

/// Plain Levenshtein edit distance between two whole words (insertions,
/// deletions, substitutions, each cost 1).
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());

    let mut row: Vec<usize> = (0..=m).collect();
    for i in 1..=n {
        let mut prev_diag = row[0];
        row[0] = i;
        for j in 1..=m {
            let above = row[j];
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            row[j] = (row[j - 1] + 1).min(above + 1).min(prev_diag + cost);
            prev_diag = above;
        }
    }
    row[m]
}

/// Every tuple of `k` non-negative integers summing to `total` (spec
/// §4.8 step 2's `Σ d_i = D`).
fn compositions(total: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 {
        return if total == 0 { vec![Vec::new()] } else { Vec::new() };
    }
    if k == 1 {
        return vec![vec![total]];
    }

    let mut out = Vec::new();
    for first in 0..=total {
        for mut rest in compositions(total - first, k - 1) {
            let mut tuple = vec![first];
            tuple.append(&mut rest);
            out.push(tuple);
        }
    }
    out
}

fn cartesian_product(per_word: &[Vec<String>]) -> Vec<Vec<String>> {
    per_word.iter().fold(vec![Vec::new()], |acc, choices| {
        let mut out = Vec::with_capacity(acc.len() * choices.len().max(1));
        for prefix in &acc {
            for choice in choices {
                let mut phrase = prefix.clone();
                phrase.push(choice.clone());
                out.push(phrase);
            }
        }
        out
    })
}
