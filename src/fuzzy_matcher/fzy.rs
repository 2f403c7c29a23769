//! Fuzzy matching algorithm based on fzy by John Hawthorn.
//! https://github.com/jhawthorn/fzy
//!
//! Fuzzy matching is treated as a modified edit-distance problem solved with
//! two DP matrices:
//! - `M[i][j]`: the best possible score using the first `i` chars of the needle
//!   and the first `j` chars of the haystack.
//! - `D[i][j]`: the best score that *ends with a match* at position `(i, j)`.
//!
//! Keeping them apart gives affine gap penalties (a constant cost to open a gap
//! and a linear cost for extending it) and a bonus for consecutive matches.
//!
//! # Example:
//! ```
//! use sift::fuzzy_matcher::FuzzyMatcher;
//! use sift::fuzzy_matcher::fzy::FzyMatcher;
//!
//! let matcher = FzyMatcher::default();
//!
//! assert_eq!(None, matcher.fuzzy_match("abc", "abx"));
//! assert!(matcher.fuzzy_match("axbycz", "abc").is_some());
//!
//! let (_score, indices) = matcher.fuzzy_indices("axbycz", "abc").unwrap();
//! assert_eq!(indices, [0, 2, 4]);
//! ```

use std::cell::RefCell;

use thread_local::ThreadLocal;

use crate::fuzzy_matcher::util::{cheap_matches, fold_case};
use crate::fuzzy_matcher::{FuzzyMatcher, IndexType, MatchIndices, ScoreType};

// fzy scores are f64, converted to i64 at the boundary by scaling.
const SCORE_MIN: f64 = f64::NEG_INFINITY;
const SCORE_MAX: f64 = f64::INFINITY;

const SCORE_GAP_LEADING: f64 = -0.005;
const SCORE_GAP_TRAILING: f64 = -0.005;
const SCORE_GAP_INNER: f64 = -0.01;

const SCORE_MATCH_CONSECUTIVE: f64 = 1.0;
const SCORE_MATCH_SLASH: f64 = 0.9;
const SCORE_MATCH_WORD: f64 = 0.8;
const SCORE_MATCH_CAPITAL: f64 = 0.7;
const SCORE_MATCH_DOT: f64 = 0.6;

/// Haystacks longer than this are not scored. They still match, with the
/// greedy positions and the lowest score.
const MATCH_MAX_LEN: usize = 1024;

/// Bonus for matching `ch` when the previous haystack char is `prev_ch`.
#[inline]
fn compute_bonus(prev_ch: char, ch: char) -> f64 {
    if !ch.is_alphanumeric() {
        return 0.0;
    }
    match prev_ch {
        '/' => SCORE_MATCH_SLASH,
        '-' | '_' | ' ' => SCORE_MATCH_WORD,
        '.' => SCORE_MATCH_DOT,
        p if ch.is_uppercase() && p.is_lowercase() => SCORE_MATCH_CAPITAL,
        _ => 0.0,
    }
}

fn precompute_bonus(haystack: &[char]) -> Vec<f64> {
    // start-of-string counts as following a path separator
    let mut prev = '/';
    haystack
        .iter()
        .map(|&ch| {
            let bonus = compute_bonus(prev, ch);
            prev = ch;
            bonus
        })
        .collect()
}

/// Row-major n×m matrix.
struct Matrix {
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            data: vec![SCORE_MIN; rows * cols],
        }
    }
    #[inline]
    fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }
    #[inline]
    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.cols + j] = value;
    }
}

/// Scores `needle` against `haystack` (both already case-folded except for the
/// bonus computation) and fills `positions` with the optimal match positions.
///
/// The caller guarantees `needle` is a non-empty subsequence of `haystack`.
fn fzy_score(needle: &[char], haystack: &[char], positions: &mut Vec<IndexType>) -> f64 {
    let n = needle.len();
    let m = haystack.len();

    if n == m {
        positions.clear();
        positions.extend(0..n);
        return SCORE_MAX;
    }

    let lower_needle: Vec<char> = needle.iter().copied().map(fold_case).collect();
    let lower_haystack: Vec<char> = haystack.iter().copied().map(fold_case).collect();
    let match_bonus = precompute_bonus(haystack);

    let mut d = Matrix::new(n, m);
    let mut best = Matrix::new(n, m);

    for i in 0..n {
        let mut prev_score = SCORE_MIN;
        let gap_score = if i == n - 1 { SCORE_GAP_TRAILING } else { SCORE_GAP_INNER };

        for j in 0..m {
            if lower_needle[i] == lower_haystack[j] {
                let score = if i == 0 {
                    (j as f64) * SCORE_GAP_LEADING + match_bonus[j]
                } else if j > 0 {
                    f64::max(
                        best.get(i - 1, j - 1) + match_bonus[j],
                        d.get(i - 1, j - 1) + SCORE_MATCH_CONSECUTIVE,
                    )
                } else {
                    SCORE_MIN
                };
                d.set(i, j, score);
                prev_score = f64::max(score, prev_score + gap_score);
            } else {
                prev_score += gap_score;
            }
            best.set(i, j, prev_score);
        }
    }

    // Backtrace: walk the needle from its last char, preferring the rightmost
    // position that achieves the best score unless a consecutive run forces it.
    positions.clear();
    positions.resize(n, 0);
    let mut match_required = false;
    let mut j = m;
    for i in (0..n).rev() {
        while j > 0 {
            j -= 1;
            let dij = d.get(i, j);
            if dij != SCORE_MIN && (match_required || dij == best.get(i, j)) {
                match_required = i > 0 && j > 0 && best.get(i, j) == d.get(i - 1, j - 1) + SCORE_MATCH_CONSECUTIVE;
                positions[i] = j;
                break;
            }
        }
    }

    best.get(n - 1, m - 1)
}

/// Converts an fzy score to sift's i64 score space, keeping three decimals.
#[inline]
fn to_score(score: f64) -> ScoreType {
    if score == SCORE_MAX {
        i64::MAX / 2
    } else if score == SCORE_MIN || score.is_nan() {
        i64::MIN / 2
    } else {
        (score * 1000.0) as ScoreType
    }
}

/// Case-insensitive fuzzy matcher using the fzy algorithm.
#[derive(Debug, Default)]
pub struct FzyMatcher {
    c_cache: ThreadLocal<RefCell<Vec<char>>>,
    p_cache: ThreadLocal<RefCell<Vec<char>>>,
}

impl FuzzyMatcher for FzyMatcher {
    fn fuzzy_indices(&self, choice: &str, pattern: &str) -> Option<(ScoreType, MatchIndices)> {
        let mut choice_chars = self.c_cache.get_or(|| RefCell::new(Vec::new())).borrow_mut();
        let mut pattern_chars = self.p_cache.get_or(|| RefCell::new(Vec::new())).borrow_mut();

        choice_chars.clear();
        choice_chars.extend(choice.chars());
        pattern_chars.clear();
        pattern_chars.extend(pattern.chars());

        if pattern_chars.is_empty() {
            return None;
        }

        let greedy = cheap_matches(&choice_chars, &pattern_chars)?;
        if choice_chars.len() > MATCH_MAX_LEN {
            return Some((to_score(SCORE_MIN), greedy));
        }

        let mut positions = Vec::with_capacity(pattern_chars.len());
        let score = fzy_score(&pattern_chars, &choice_chars, &mut positions);
        Some((to_score(score), positions))
    }
}

/// Fuzzy match `choice` against `pattern`, returning the score and matched
/// character indices.
pub fn fuzzy_indices(choice: &str, pattern: &str) -> Option<(ScoreType, MatchIndices)> {
    FzyMatcher::default().fuzzy_indices(choice, pattern)
}

/// Fuzzy match `choice` against `pattern`, returning only the score.
pub fn fuzzy_match(choice: &str, pattern: &str) -> Option<ScoreType> {
    FzyMatcher::default().fuzzy_match(choice, pattern)
}
