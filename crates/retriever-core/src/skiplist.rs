//! Skip-list posting lists (component C3).
//!
//! A [`PostingList`] is a strictly ordered, duplicate-free sequence of
//! [`Posting`]s with `⌈√n⌉`-spaced forward pointers, rebuilt after every
//! structural mutation, used to accelerate the merge-style set operations
//! the evaluator relies on (spec §3, §4.3).

use crate::posting::Posting;
use itertools::Itertools;

/// An ordered, duplicate-free sequence of postings with forward pointers
/// for fast merge-style traversal.
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    postings: Vec<Posting>,
    /// `forward[i]` is the index a galloping search may jump to from `i`,
    /// or `None` if `i` carries no pointer. Always the same length as
    /// `postings`; the last slot is always `None` (the last element never
    /// carries a forward pointer).
    forward: Vec<Option<usize>>,
}

impl PostingList {
    pub fn new() -> PostingList {
        PostingList { postings: Vec::new(), forward: Vec::new() }
    }

    /// Builds a posting list from postings already sorted and deduplicated
    /// by document id, computing forward pointers once.
    pub fn from_sorted_unique(postings: Vec<Posting>) -> PostingList {
        let mut list = PostingList { postings, forward: Vec::new() };
        list.rebuild_forward_pointers();
        list
    }

    pub fn add(&mut self, posting: Posting) {
        self.add_all(std::iter::once(posting));
    }

    /// Batched insertion: merges `postings` into the list in one sort pass
    /// rather than one insertion-sort step per element, as spec §4.3
    /// recommends ("batched form strictly preferred").
    pub fn add_all(&mut self, postings: impl IntoIterator<Item = Posting>) {
        self.postings.extend(postings);
        self.postings.sort_unstable_by_key(|p| p.document_id);

        let mut merged: Vec<Posting> = Vec::with_capacity(self.postings.len());
        for mut posting in self.postings.drain(..) {
            match merged.last_mut() {
                Some(last) if *last == posting => last.merge_positions(&posting),
                _ => {
                    posting.positions.sort_unstable();
                    posting.positions.dedup();
                    merged.push(posting);
                }
            }
        }
        self.postings = merged;
        self.rebuild_forward_pointers();
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn as_slice(&self) -> &[Posting] {
        &self.postings
    }

    pub fn into_vec(self) -> Vec<Posting> {
        self.postings
    }

    pub fn forward_pointer_count(&self) -> usize {
        self.forward.iter().filter(|p| p.is_some()).count()
    }

    fn rebuild_forward_pointers(&mut self) {
        let n = self.postings.len();
        self.forward = vec![None; n];
        if n < 2 {
            return;
        }

        let step = ceil_sqrt(n);
        let spacing = ceil_div(n, step);

        let mut i = 0;
        while i < n - 1 {
            let target = (i + spacing).min(n - 1);
            if target > i {
                self.forward[i] = Some(target);
            }
            i += spacing;
        }
    }

    /// `O(n + m)` intersection using the classic galloping-with-skip-
    /// pointers merge (spec §4.3).
    pub fn intersect(a: &PostingList, b: &PostingList) -> PostingList {
        let (mut i, mut j) = (0usize, 0usize);
        let mut out = Vec::new();

        while i < a.postings.len() && j < b.postings.len() {
            let (doc_a, doc_b) = (a.postings[i].document_id, b.postings[j].document_id);
            if doc_a == doc_b {
                let mut posting = a.postings[i].clone();
                posting.merge_positions(&b.postings[j]);
                out.push(posting);
                i += 1;
                j += 1;
            } else if doc_a < doc_b {
                while let Some(target) = a.forward[i] {
                    if a.postings[target].document_id <= doc_b {
                        i = target;
                    } else {
                        break;
                    }
                }
                i += 1;
            } else {
                while let Some(target) = b.forward[j] {
                    if b.postings[target].document_id <= doc_a {
                        j = target;
                    } else {
                        break;
                    }
                }
                j += 1;
            }
        }

        PostingList::from_sorted_unique(out)
    }

    /// `O(n + m)` union.
    pub fn union(a: &PostingList, b: &PostingList) -> PostingList {
        let (mut i, mut j) = (0usize, 0usize);
        let mut out = Vec::with_capacity(a.len() + b.len());

        while i < a.postings.len() && j < b.postings.len() {
            let (doc_a, doc_b) = (a.postings[i].document_id, b.postings[j].document_id);
            if doc_a == doc_b {
                let mut posting = a.postings[i].clone();
                posting.merge_positions(&b.postings[j]);
                out.push(posting);
                i += 1;
                j += 1;
            } else if doc_a < doc_b {
                out.push(a.postings[i].clone());
                i += 1;
            } else {
                out.push(b.postings[j].clone());
                j += 1;
            }
        }
        out.extend(a.postings[i..].iter().cloned());
        out.extend(b.postings[j..].iter().cloned());

        PostingList::from_sorted_unique(out)
    }

    /// `O(n + m)` set difference: postings of `a` whose document id does
    /// not appear in `b`.
    pub fn difference(a: &PostingList, b: &PostingList) -> PostingList {
        let (mut i, mut j) = (0usize, 0usize);
        let mut out = Vec::new();

        while i < a.postings.len() && j < b.postings.len() {
            let (doc_a, doc_b) = (a.postings[i].document_id, b.postings[j].document_id);
            if doc_a == doc_b {
                i += 1;
                j += 1;
            } else if doc_a < doc_b {
                out.push(a.postings[i].clone());
                i += 1;
            } else {
                j += 1;
            }
        }
        out.extend(a.postings[i..].iter().cloned());

        PostingList::from_sorted_unique(out)
    }

    /// Positions of `b` that follow some position of `a` in the same
    /// document by a directional gap in `(0, max_gap]`. The output postings
    /// carry those `b`-positions, so that joining a three-word phrase
    /// `w1 w2 w3` can chain `positional_join(positional_join(w1, w2, 1), w3, 1)`.
    pub fn positional_join(a: &PostingList, b: &PostingList, max_gap: usize) -> PostingList {
        let mut out = Vec::new();

        for (pa, pb) in matching_documents(a, b) {
            let matches: Vec<usize> = pb
                .positions
                .iter()
                .copied()
                .filter(|&p_b| {
                    pa.positions.iter().any(|&p_a| p_b > p_a && p_b - p_a <= max_gap)
                })
                .sorted()
                .dedup()
                .collect();

            if !matches.is_empty() {
                out.push(Posting::new(pa.document_id, matches));
            }
        }

        PostingList::from_sorted_unique(out)
    }
}

fn matching_documents<'a>(
    a: &'a PostingList,
    b: &'a PostingList,
) -> impl Iterator<Item = (&'a Posting, &'a Posting)> {
    let (mut i, mut j) = (0usize, 0usize);
    std::iter::from_fn(move || {
        while i < a.postings.len() && j < b.postings.len() {
            let (doc_a, doc_b) = (a.postings[i].document_id, b.postings[j].document_id);
            if doc_a == doc_b {
                let pair = (&a.postings[i], &b.postings[j]);
                i += 1;
                j += 1;
                return Some(pair);
            } else if doc_a < doc_b {
                i += 1;
            } else {
                j += 1;
            }
        }
        None
    })
}

fn ceil_sqrt(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut r = (n as f64).sqrt() as usize;
    while r * r < n {
        r += 1;
    }
    while r > 0 && (r - 1) * (r - 1) >= n {
        r -= 1;
    }
    r.max(1)
}

fn ceil_div(n: usize, d: usize) -> usize {
    n.div_ceil(d)
}
