//! Gestalt pattern matching (Ratcliff/Obershelp).
//!
//! The similarity ratio is `2 * M / (len(a) + len(b))` where `M` is the total
//! size of the matching blocks found by recursively taking the longest common
//! run and matching to its left and right. Sequences are compared per Unicode
//! scalar value. When `b` has 200 or more elements, elements that make up more
//! than 1% of `b` are "popular" and cannot seed a match, though matches may
//! still extend across them.

use std::collections::HashMap;

const AUTOJUNK_MIN_LEN: usize = 200;

/// Matcher with `b` preprocessed so it can be compared against many `a`s.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
}

/// A run `a[a_start..a_start + size] == b[b_start..b_start + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let b2j = index_b(&b);
        Self { a, b, b2j }
    }

    /// Longest matching run inside `a[alo..ahi]` and `b[blo..bhi]`, earliest in
    /// `a` (then in `b`) on ties.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Popular elements were left out of the index; grow across them.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        Match {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    /// All non-overlapping matching blocks, ordered by position.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let found = self.find_longest_match(alo, ahi, blo, bhi);
            if found.size == 0 {
                continue;
            }
            if alo < found.a_start && blo < found.b_start {
                queue.push((alo, found.a_start, blo, found.b_start));
            }
            let a_end = found.a_start + found.size;
            let b_end = found.b_start + found.size;
            if a_end < ahi && b_end < bhi {
                queue.push((a_end, ahi, b_end, bhi));
            }
            blocks.push(found);
        }
        blocks.sort_by_key(|block| (block.a_start, block.b_start));
        blocks
    }

    /// Similarity in `[0, 1]`; two empty sequences are identical.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|block| block.size).sum();
        2.0 * matches as f64 / total as f64
    }
}

fn index_b(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, ch) in b.iter().enumerate() {
        b2j.entry(*ch).or_default().push(j);
    }
    let n = b.len();
    if n >= AUTOJUNK_MIN_LEN {
        let threshold = n / 100 + 1;
        b2j.retain(|_, positions| positions.len() <= threshold);
    }
    b2j
}

/// Similarity ratio between two strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(a, b).ratio()
}
