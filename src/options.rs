//! Configuration options for sift.
//!
//! This module provides the `FilterOptions` struct and builder, parsed from the
//! command line when the `cli` feature is enabled.

use derive_builder::Builder;

use crate::binds::KeyMap;
use crate::tui::options::TuiLayout;

/// sift - interactive fuzzy filter
///
/// Reads candidates from stdin, lets you narrow them down by typing, and
/// prints the chosen ones.
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(name = "final_build"))]
#[builder(default)]
#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(
    feature = "cli",
    command(name = "sift", args_override_self = true, verbatim_doc_comment, version, about)
)]
pub struct FilterOptions {
    //  --- Search ---
    /// Use exact (case-insensitive substring) matching instead of fuzzy matching
    #[cfg_attr(
        feature = "cli",
        arg(long = "no-fuzzy", action = clap::ArgAction::SetFalse, help_heading = "Search")
    )]
    pub fuzzy: bool,

    /// Keep input order instead of ranking fuzzy results by score
    #[cfg_attr(
        feature = "cli",
        arg(long = "no-sort", action = clap::ArgAction::SetFalse, help_heading = "Search")
    )]
    pub sort: bool,

    /// Offer the query itself as a candidate
    ///
    /// Lets you submit text that is not part of the input.
    #[cfg_attr(
        feature = "cli",
        arg(long = "no-strict", action = clap::ArgAction::SetFalse, help_heading = "Search")
    )]
    pub strict: bool,

    /// Initial query
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Search"))]
    pub query: Option<String>,

    //  --- Interface ---
    /// Maximum number of items that can be selected
    #[cfg_attr(feature = "cli", arg(long, default_value = "1", help_heading = "Interface"))]
    pub limit: usize,

    /// Allow selecting every item
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Interface"))]
    pub no_limit: bool,

    /// Custom key bindings
    ///
    /// Comma-separated `KEY:ACTION[+ACTION...]` pairs, for example
    /// `--bind 'ctrl-t:toggle-all,alt-j:down'`. Can be repeated.
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Interface", verbatim_doc_comment))]
    pub bind: Vec<String>,

    /// Color configuration
    ///
    /// A base theme (`dark`, `light`, `16`, `bw`, `none`) optionally followed
    /// by `COMPONENT:COLOR[:MODIFIER]` overrides, all comma-separated.
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Interface", verbatim_doc_comment))]
    pub color: Option<String>,

    //  --- Layout ---
    /// Put the query field at the bottom with the first match right above it
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Layout"))]
    pub reverse: bool,

    /// Maximum number of list lines, 0 to fill the terminal
    #[cfg_attr(feature = "cli", arg(long, default_value = "0", help_heading = "Layout"))]
    pub height: u16,

    /// Header shown above the query (below it with --reverse)
    #[cfg_attr(feature = "cli", arg(long, default_value = "", help_heading = "Layout"))]
    pub header: String,

    /// Query prompt
    #[cfg_attr(feature = "cli", arg(long, default_value = "> ", help_heading = "Layout"))]
    pub prompt: String,

    /// Text shown while the query is empty
    #[cfg_attr(feature = "cli", arg(long, default_value = "Filter...", help_heading = "Layout"))]
    pub placeholder: String,

    /// Cursor indicator
    #[cfg_attr(feature = "cli", arg(long, default_value = "•", help_heading = "Layout"))]
    pub indicator: String,

    /// Prefix of selected items
    #[cfg_attr(feature = "cli", arg(long, default_value = " ◉ ", help_heading = "Layout"))]
    pub selected_prefix: String,

    /// Prefix of unselected items when several can be selected
    #[cfg_attr(feature = "cli", arg(long, default_value = " ○ ", help_heading = "Layout"))]
    pub unselected_prefix: String,

    /// Hide the key help line
    #[cfg_attr(
        feature = "cli",
        arg(long = "no-show-help", action = clap::ArgAction::SetFalse, help_heading = "Layout")
    )]
    pub show_help: bool,

    //  --- Scripting ---
    /// Select the only candidate without showing the interface
    #[cfg_attr(feature = "cli", arg(short = '1', long, help_heading = "Scripting"))]
    pub select_1: bool,

    /// Exit right away when there are no candidates
    #[cfg_attr(feature = "cli", arg(short = '0', long, help_heading = "Scripting"))]
    pub exit_0: bool,

    /// Newline-separated items selected at start
    #[cfg_attr(feature = "cli", arg(long, default_value = "", help_heading = "Scripting"))]
    pub pre_select_items: String,

    /// Print the query as the first line
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Scripting"))]
    pub print_query: bool,

    /// Read input delimited by ASCII NUL characters
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Scripting"))]
    pub read0: bool,

    /// Print output delimited by ASCII NUL characters
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Scripting"))]
    pub print0: bool,

    /// The internal (parsed) keymap
    #[cfg_attr(feature = "cli", clap(skip))]
    pub keymap: KeyMap,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            fuzzy: true,
            sort: true,
            strict: true,
            query: Default::default(),
            limit: 1,
            no_limit: Default::default(),
            bind: Default::default(),
            color: Default::default(),
            reverse: Default::default(),
            height: 0,
            header: Default::default(),
            prompt: String::from("> "),
            placeholder: String::from("Filter..."),
            indicator: String::from("•"),
            selected_prefix: String::from(" ◉ "),
            unselected_prefix: String::from(" ○ "),
            show_help: true,
            select_1: Default::default(),
            exit_0: Default::default(),
            pre_select_items: Default::default(),
            print_query: Default::default(),
            read0: Default::default(),
            print0: Default::default(),
            keymap: Default::default(),
        }
    }
}

impl FilterOptionsBuilder {
    /// Builds the FilterOptions from the builder
    pub fn build(&mut self) -> Result<FilterOptions, FilterOptionsBuilderError> {
        self.final_build().map(|opts| opts.build())
    }
}

impl FilterOptions {
    /// Finalizes the options by parsing the key bindings
    pub fn build(mut self) -> Self {
        self.keymap = self.bind.iter().fold(KeyMap::default(), |mut res, part| {
            res.add_keymaps(part.split(','));
            res
        });
        self
    }

    /// Selection limit for `candidates` items, resolving `no_limit`
    pub fn effective_limit(&self, candidates: usize) -> usize {
        if self.no_limit { candidates } else { self.limit }
    }

    /// Layout derived from `reverse`
    pub fn layout(&self) -> TuiLayout {
        TuiLayout::from_reverse(self.reverse)
    }

    /// Texts to select at start
    pub fn pre_selected(&self) -> impl Iterator<Item = &str> {
        self.pre_select_items.lines().filter(|line| !line.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::event::Action;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn builder_defaults() {
        let options = FilterOptionsBuilder::default().build().unwrap();
        assert!(options.fuzzy && options.sort && options.strict && options.show_help);
        assert_eq!(options.limit, 1);
        assert_eq!(options.height, 0);
        assert_eq!(options.indicator, "•");
        assert_eq!(options.prompt, "> ");
        assert_eq!(options.layout(), TuiLayout::Forward);
    }

    #[test]
    fn build_parses_bindings() {
        let options = FilterOptionsBuilder::default()
            .bind(vec!["ctrl-t:toggle-all".to_string(), "esc:abort".to_string()])
            .build()
            .unwrap();
        assert_eq!(
            options.keymap.get(&KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL)),
            Some(&vec![Action::ToggleAll])
        );
        assert_eq!(
            options.keymap.get(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Some(&vec![Action::Abort])
        );
    }

    #[test]
    fn no_limit_uses_candidate_count() {
        let options = FilterOptionsBuilder::default().no_limit(true).build().unwrap();
        assert_eq!(options.effective_limit(42), 42);
        let options = FilterOptionsBuilder::default().limit(3usize).build().unwrap();
        assert_eq!(options.effective_limit(42), 3);
    }

    #[test]
    fn pre_selected_skips_blank_lines() {
        let options = FilterOptionsBuilder::default()
            .pre_select_items("a\n\nb\n".to_string())
            .build()
            .unwrap();
        assert_eq!(options.pre_selected().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn parses_negated_flags() {
        use clap::Parser;
        let options = FilterOptions::parse_from(["sift", "--no-fuzzy", "--no-strict", "--limit", "3", "--reverse"]);
        assert!(!options.fuzzy);
        assert!(options.sort);
        assert!(!options.strict);
        assert_eq!(options.limit, 3);
        assert_eq!(options.layout(), TuiLayout::Reverse);

        let options = FilterOptions::parse_from(["sift"]);
        assert!(options.fuzzy && options.sort && options.strict && options.show_help);
        assert_eq!(options.indicator, "•");
        assert_eq!(options.placeholder, "Filter...");
    }
}
