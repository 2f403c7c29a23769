//! Sift is an interactive fuzzy filter for the terminal.
//!
//! It reads a list of candidates, lets the user narrow it down by typing a
//! query, move through the matches and pick one or several of them. Sift can be
//! used as a library or as a command-line tool.
//!
//! # Examples
//!
//! ```no_run
//! use sift::prelude::*;
//!
//! let options = FilterOptionsBuilder::default()
//!     .limit(3)
//!     .reverse(true)
//!     .build()
//!     .unwrap();
//!
//! let candidates = ["awk", "bash", "csh", "dash", "fish", "ksh", "zsh"]
//!     .map(String::from)
//!     .to_vec();
//!
//! let output = Filter::run_with(options, candidates).unwrap();
//! if let Outcome::Submitted(shells) = output.outcome {
//!     println!("{shells:?}");
//! }
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub use crate::filter::Filter;
pub use crate::options::FilterOptions;
pub use crate::output::{FilterOutput, Outcome};

pub mod binds;
mod filter;
pub mod fuzzy_matcher;
pub mod helper;
pub mod item;
pub mod matcher;
pub mod options;
mod output;
pub mod prelude;
pub mod reader;
pub mod selection;
pub mod theme;
pub mod tui;
mod util;
