//! Turns a query and the candidate list into the ordered match list.
use std::cmp::Reverse;
use std::sync::Arc;

use crate::fuzzy_matcher::FuzzyMatcher;
use crate::fuzzy_matcher::fzy::FzyMatcher;
use crate::fuzzy_matcher::util::fold_case;
use crate::item::MatchedItem;
use crate::options::FilterOptions;

/// How the query is compared against candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Subsequence matching, optionally ranked by score
    Fuzzy {
        /// Order results by descending score instead of input order
        sort: bool,
    },
    /// Case-insensitive substring matching, input order
    Exact,
}

impl Default for MatchMode {
    fn default() -> Self {
        Self::Fuzzy { sort: true }
    }
}

//==============================================================================
/// Computes the match list for a query.
///
/// Matching is synchronous and runs in full on every call; it never fails.
pub struct Matcher {
    mode: MatchMode,
    strict: bool,
    fuzzy: Box<dyn FuzzyMatcher>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Matcher {
    /// Creates a strict fuzzy+sort Matcher backed by fzy.
    pub fn builder() -> Self {
        Self {
            mode: MatchMode::default(),
            strict: true,
            fuzzy: Box::new(FzyMatcher::default()),
        }
    }

    /// Sets the match mode.
    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// When not strict, the query itself is offered as a candidate.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replaces the fuzzy scoring algorithm.
    pub fn fuzzy_matcher(mut self, fuzzy: Box<dyn FuzzyMatcher>) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    /// Finalizes the builder and returns the configured Matcher.
    pub fn build(self) -> Self {
        self
    }

    /// Creates a Matcher configured from the given FilterOptions.
    pub fn from_options(options: &FilterOptions) -> Self {
        let mode = if options.fuzzy {
            MatchMode::Fuzzy { sort: options.sort }
        } else {
            MatchMode::Exact
        };
        Self::builder().mode(mode).strict(options.strict).build()
    }

    /// Returns the match mode.
    pub fn match_mode(&self) -> MatchMode {
        self.mode
    }

    /// Matches `query` against `candidates`.
    ///
    /// An empty query returns every candidate in input order with no positions.
    /// Otherwise, in non-strict mode, the query is prepended as candidate 0 and
    /// the others are shifted by one before matching.
    pub fn run(&self, query: &str, candidates: &[Arc<str>]) -> Vec<MatchedItem> {
        if query.is_empty() {
            return match_all(candidates);
        }

        let augmented;
        let candidates = if self.strict {
            candidates
        } else {
            augmented = std::iter::once(Arc::<str>::from(query))
                .chain(candidates.iter().cloned())
                .collect::<Vec<_>>();
            &augmented[..]
        };

        let matches = match self.mode {
            MatchMode::Fuzzy { sort } => {
                let mut matches = self.fuzzy_matches(query, candidates);
                if sort {
                    // stable: equal scores keep input order
                    matches.sort_by_key(|item| Reverse(item.score));
                }
                matches
            }
            MatchMode::Exact => exact_matches(query, candidates),
        };
        debug!(
            "matcher: query {query:?}, mode {:?}, {} of {} matched",
            self.mode,
            matches.len(),
            candidates.len()
        );
        matches
    }

    fn fuzzy_matches(&self, query: &str, candidates: &[Arc<str>]) -> Vec<MatchedItem> {
        candidates
            .iter()
            .enumerate()
            .filter_map(|(index, text)| {
                let (score, matched_indices) = self.fuzzy.fuzzy_indices(text, query)?;
                Some(MatchedItem {
                    text: text.clone(),
                    index,
                    matched_indices,
                    score,
                })
            })
            .collect()
    }
}

/// Every candidate, unmatched, in input order
pub fn match_all(candidates: &[Arc<str>]) -> Vec<MatchedItem> {
    candidates
        .iter()
        .enumerate()
        .map(|(index, text)| MatchedItem::unmatched(text.clone(), index))
        .collect()
}

fn exact_matches(query: &str, candidates: &[Arc<str>]) -> Vec<MatchedItem> {
    let needle: Vec<char> = query.chars().map(fold_case).collect();
    candidates
        .iter()
        .enumerate()
        .filter_map(|(index, text)| {
            let matched_indices = exact_positions(text, &needle)?;
            Some(MatchedItem {
                text: text.clone(),
                index,
                matched_indices,
                score: 0,
            })
        })
        .collect()
}

/// Char positions of the first case-insensitive occurrence of `needle` in `text`.
fn exact_positions(text: &str, needle: &[char]) -> Option<Vec<usize>> {
    let haystack: Vec<char> = text.chars().map(fold_case).collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    let start = haystack.windows(needle.len()).position(|window| window == needle)?;
    Some((start..start + needle.len()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(texts: &[&str]) -> Vec<Arc<str>> {
        texts.iter().map(|&t| Arc::from(t)).collect()
    }

    fn texts(matches: &[MatchedItem]) -> Vec<&str> {
        matches.iter().map(MatchedItem::text).collect()
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let items = candidates(&["b", "a", "c"]);
        for matcher in [
            Matcher::default(),
            Matcher::builder().mode(MatchMode::Exact).build(),
            Matcher::builder().strict(false).build(),
        ] {
            let matches = matcher.run("", &items);
            assert_eq!(texts(&matches), vec!["b", "a", "c"]);
            assert!(matches.iter().all(|m| m.matched_indices.is_empty()));
            assert_eq!(matches.iter().map(|m| m.index).collect::<Vec<_>>(), vec![0, 1, 2]);
        }
    }

    #[test]
    fn fuzzy_ap_scenario() {
        let items = candidates(&["apple", "banana", "grape"]);
        let matches = Matcher::default().run("ap", &items);
        assert_eq!(texts(&matches), vec!["apple", "grape"]);
        assert_eq!(matches[0].matched_indices, vec![0, 1]);
        assert_eq!(matches[1].matched_indices, vec![2, 3]);
        assert_eq!(matches[1].index, 2);
    }

    #[test]
    fn fuzzy_sort_ranks_by_score() {
        let items = candidates(&["a_x_b", "xxab", "ab"]);
        let matches = Matcher::default().run("ab", &items);
        assert_eq!(texts(&matches)[0], "ab");
        assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn fuzzy_sort_is_stable_for_ties() {
        let items = candidates(&["xab", "yab", "zab"]);
        let matches = Matcher::default().run("ab", &items);
        assert_eq!(texts(&matches), vec!["xab", "yab", "zab"]);
    }

    #[test]
    fn fuzzy_unsorted_keeps_input_order() {
        let items = candidates(&["a_x_b", "xxab", "ab", "nope"]);
        let matches = Matcher::builder().mode(MatchMode::Fuzzy { sort: false }).build().run("ab", &items);
        assert_eq!(texts(&matches), vec!["a_x_b", "xxab", "ab"]);
    }

    #[test]
    fn exact_positions_cover_first_occurrence() {
        let items = candidates(&["Hello World", "world peace", "word"]);
        let matches = Matcher::builder().mode(MatchMode::Exact).build().run("WOR", &items);
        assert_eq!(texts(&matches), vec!["Hello World", "world peace", "word"]);
        assert_eq!(matches[0].matched_indices, vec![6, 7, 8]);
        assert_eq!(matches[1].matched_indices, vec![0, 1, 2]);

        let matches = Matcher::builder().mode(MatchMode::Exact).build().run("orl", &items);
        assert_eq!(texts(&matches), vec!["Hello World", "world peace"]);
        assert_eq!(matches[0].matched_indices, vec![7, 8, 9]);
    }

    #[test]
    fn exact_positions_are_char_offsets() {
        let items = candidates(&["héllo wörld"]);
        let matches = Matcher::builder().mode(MatchMode::Exact).build().run("wö", &items);
        assert_eq!(matches[0].matched_indices, vec![6, 7]);
    }

    #[test]
    fn exact_rejects_subsequences() {
        let items = candidates(&["a-b-c"]);
        assert!(Matcher::builder().mode(MatchMode::Exact).build().run("abc", &items).is_empty());
    }

    #[test]
    fn non_strict_prepends_query() {
        let items = candidates(&["apple", "banana"]);
        let matcher = Matcher::builder().strict(false).mode(MatchMode::Fuzzy { sort: false }).build();
        let matches = matcher.run("an", &items);
        assert_eq!(texts(&matches), vec!["an", "banana"]);
        assert_eq!(matches[0].index, 0);
        assert_eq!(matches[1].index, 2);

        let matches = matcher.run("zzz", &items);
        assert_eq!(texts(&matches), vec!["zzz"]);
    }

    #[test]
    fn non_strict_exact_prepends_query() {
        let items = candidates(&["apple"]);
        let matches = Matcher::builder()
            .strict(false)
            .mode(MatchMode::Exact)
            .build()
            .run("pl", &items);
        assert_eq!(texts(&matches), vec!["pl", "apple"]);
        assert_eq!(matches[1].matched_indices, vec![2, 3]);
    }

    #[test]
    fn from_options_picks_mode() {
        let options = FilterOptions {
            fuzzy: false,
            ..Default::default()
        };
        assert_eq!(Matcher::from_options(&options).match_mode(), MatchMode::Exact);
        let options = FilterOptions {
            sort: false,
            ..Default::default()
        };
        assert_eq!(
            Matcher::from_options(&options).match_mode(),
            MatchMode::Fuzzy { sort: false }
        );
    }
}
