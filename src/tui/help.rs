//! Key help line shown under the list, after a blank separator row.

use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};

use crate::options::FilterOptions;
use crate::theme::ColorTheme;
use crate::tui::widget::FilterWidget;

/// Rows taken by the help: a blank separator and the help line
pub const HELP_HEIGHT: u16 = 2;

/// Key help line
#[derive(Clone, Default)]
pub struct Help {
    /// Whether the help is shown at all
    pub visible: bool,
    /// Whether the toggle entries are listed
    pub multi: bool,
    theme: Arc<ColorTheme>,
}

impl Help {
    /// Rows the help takes, 0 when hidden
    pub fn height(&self) -> u16 {
        if self.visible { HELP_HEIGHT } else { 0 }
    }

    /// The help text for the current mode
    pub fn text(&self) -> String {
        let mut entries = vec!["↓↑ navigate"];
        if self.multi {
            entries.push("tab toggle");
            entries.push("ctrl+a select all");
        }
        entries.push("enter submit");
        entries.join(" • ")
    }
}

impl FilterWidget for Help {
    fn from_options(options: &FilterOptions, theme: Arc<ColorTheme>) -> Self {
        Self {
            visible: options.show_help,
            multi: false,
            theme,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.height == 0 {
            return;
        }
        // the separator is the first row
        let line_area = Rect {
            y: area.y + area.height - 1,
            height: 1,
            ..area
        };
        Paragraph::new(Line::styled(self.text(), self.theme.help)).render(line_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_depends_on_multi() {
        let mut help = Help::from_options(&FilterOptions::default(), Arc::default());
        assert_eq!(help.text(), "↓↑ navigate • enter submit");
        help.multi = true;
        assert_eq!(help.text(), "↓↑ navigate • tab toggle • ctrl+a select all • enter submit");
    }

    #[test]
    fn hidden_help_takes_no_room() {
        let options = FilterOptions {
            show_help: false,
            ..Default::default()
        };
        assert_eq!(Help::from_options(&options, Arc::default()).height(), 0);
        assert_eq!(Help::from_options(&FilterOptions::default(), Arc::default()).height(), 2);
    }
}
