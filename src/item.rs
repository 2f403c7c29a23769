//! Matched candidates.

use std::sync::Arc;

/// A candidate that survived matching, together with where it matched.
///
/// `index` is the position of the candidate in the list the matcher ran over
/// (the augmented list when the query was prepended). `matched_indices` are
/// character offsets into `text`, empty when no query was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedItem {
    /// The candidate text
    pub text: Arc<str>,
    /// Position in the matched-over candidate list
    pub index: usize,
    /// Character offsets of the matched query characters
    pub matched_indices: Vec<usize>,
    /// Relevance score, higher is better
    pub score: i64,
}

impl MatchedItem {
    /// Build an item that was not matched against anything
    pub fn unmatched(text: Arc<str>, index: usize) -> Self {
        Self {
            text,
            index,
            matched_indices: Vec::new(),
            score: 0,
        }
    }

    /// The candidate text
    pub fn text(&self) -> &str {
        &self.text
    }
}
