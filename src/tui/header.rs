//! Header display widget.
//!
//! Static text above the query in forward layout, below the list in reverse.
use crate::options::FilterOptions;
use crate::theme::ColorTheme;
use crate::tui::widget::FilterWidget;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Widget};
use std::sync::Arc;

const TABSTOP: usize = 8;

/// Header widget for displaying static text around the list
#[derive(Clone, Default)]
pub struct Header {
    /// The header text, with tabs expanded
    pub header: String,
    theme: Arc<ColorTheme>,
}

impl Header {
    /// Gets the header height (number of lines)
    pub fn height(&self) -> u16 {
        self.header.lines().count().min(u16::MAX as usize) as u16
    }
}

/// Expands tab characters to spaces based on tabstop width and current position
fn apply_tabstop(text: &str, tabstop: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        match ch {
            '\t' => {
                let tab_width = tabstop - (current_width % tabstop);
                result.push_str(&" ".repeat(tab_width));
                current_width += tab_width;
            }
            '\n' => {
                result.push(ch);
                current_width = 0;
            }
            _ => {
                result.push(ch);
                current_width += crate::util::str_width(ch.encode_utf8(&mut [0; 4]));
            }
        }
    }

    result
}

impl FilterWidget for Header {
    fn from_options(options: &FilterOptions, theme: Arc<ColorTheme>) -> Self {
        Self {
            header: apply_tabstop(&options.header, TABSTOP),
            theme,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if self.header.is_empty() {
            return;
        }
        Paragraph::new(Text::styled(self.header.as_str(), self.theme.header)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_are_expanded_per_line() {
        assert_eq!(apply_tabstop("a\tb", 4), "a   b");
        assert_eq!(apply_tabstop("ab\ncd\te", 4), "ab\ncd  e");
    }

    #[test]
    fn height_counts_lines() {
        let options = FilterOptions {
            header: "one\ntwo".into(),
            ..Default::default()
        };
        assert_eq!(Header::from_options(&options, Arc::default()).height(), 2);
        assert_eq!(Header::default().height(), 0);
    }
}
