//! Convenience re-exports of commonly used types.
//!
//! This module provides a convenient way to import all the commonly used
//! sift types and traits with a single `use sift::prelude::*;` statement.

pub use crate::fuzzy_matcher::{FuzzyMatcher, fzy::FzyMatcher};
pub use crate::item::MatchedItem;
pub use crate::matcher::{MatchMode, Matcher};
pub use crate::options::{FilterOptions, FilterOptionsBuilder};
pub use crate::reader::{ReaderOption, read_candidates};
pub use crate::selection::SelectionSet;
pub use crate::tui::{Event, event::Action};
pub use crate::*;
pub use std::sync::Arc;
