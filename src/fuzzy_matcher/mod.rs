//! Fuzzy matching algorithms.
//!
//! The matcher only depends on the [`FuzzyMatcher`] trait; [`fzy::FzyMatcher`]
//! is the implementation shipped with sift.

/// Fzy fuzzy matching algorithm
pub mod fzy;
pub(crate) mod util;

pub(crate) type IndexType = usize;
pub(crate) type ScoreType = i64;

/// Character indices of the matched pattern characters, strictly increasing
pub type MatchIndices = Vec<IndexType>;

/// Trait for fuzzy matching text patterns against choices
pub trait FuzzyMatcher: Send + Sync {
    /// fuzzy match choice with pattern, and return the score & matched indices of characters
    fn fuzzy_indices(&self, choice: &str, pattern: &str) -> Option<(ScoreType, MatchIndices)>;

    /// fuzzy match choice with pattern, and return the score of matching
    fn fuzzy_match(&self, choice: &str, pattern: &str) -> Option<ScoreType> {
        self.fuzzy_indices(choice, pattern).map(|(score, _)| score)
    }
}
