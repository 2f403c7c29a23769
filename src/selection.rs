//! Bounded multi-selection.
//!
//! Selected candidates are keyed by their text, so membership survives the
//! match list being rebuilt. Insertion order is kept for output.

use std::sync::Arc;

use indexmap::IndexSet;

use crate::item::MatchedItem;

/// Set of selected candidate texts with at most `limit` members.
///
/// With `limit <= 1` the set is inert: every mutation except
/// [`SelectionSet::deselect_all`] is a no-op.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    items: IndexSet<Arc<str>>,
    limit: usize,
}

impl SelectionSet {
    /// Creates an empty selection holding at most `limit` texts
    pub fn new(limit: usize) -> Self {
        Self {
            items: IndexSet::new(),
            limit,
        }
    }

    /// Maximum number of members
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether more than one item can be selected
    pub fn is_multi(&self) -> bool {
        self.limit > 1
    }

    /// Number of selected texts
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `text` is selected
    pub fn contains(&self, text: &str) -> bool {
        self.items.contains(text)
    }

    /// Removes `text` if selected, otherwise adds it when there is room.
    pub fn toggle(&mut self, text: &Arc<str>) {
        if !self.is_multi() {
            return;
        }
        if self.items.shift_remove(&**text) {
            trace!("deselected {text:?}");
        } else if self.items.len() < self.limit {
            trace!("selected {text:?}");
            self.items.insert(text.clone());
        }
    }

    /// Adds `text` if there is room. Returns whether it is a member afterwards.
    pub fn select(&mut self, text: &Arc<str>) -> bool {
        if !self.is_multi() {
            return false;
        }
        if !self.items.contains(&**text) && self.items.len() < self.limit {
            self.items.insert(text.clone());
        }
        self.items.contains(&**text)
    }

    /// Adds matches in display order until the limit is reached.
    pub fn select_all(&mut self, matches: &[MatchedItem]) {
        if !self.is_multi() {
            return;
        }
        for item in matches {
            if self.items.len() >= self.limit {
                break;
            }
            if !self.items.contains(item.text()) {
                self.items.insert(item.text.clone());
            }
        }
        debug!("select all: {} selected", self.items.len());
    }

    /// Clears the selection, whatever the limit.
    pub fn deselect_all(&mut self) {
        self.items.clear();
    }

    /// Selects all matches while the selection is smaller than both the match
    /// list and the limit, otherwise clears it.
    pub fn toggle_all(&mut self, matches: &[MatchedItem]) {
        if !self.is_multi() {
            return;
        }
        if self.items.len() < matches.len() && self.items.len() < self.limit {
            self.select_all(matches);
        } else {
            self.deselect_all();
        }
    }

    /// Selected texts in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<str>> {
        self.items.iter()
    }

    /// Selected texts in insertion order, owned
    pub fn to_vec(&self) -> Vec<String> {
        self.items.iter().map(|text| text.to_string()).collect()
    }
}
