use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use std::sync::Arc;

use crate::options::FilterOptions;
use crate::theme::ColorTheme;

/// Trait for sift TUI widgets
pub trait FilterWidget: Sized {
    /// Create a widget from options and theme
    fn from_options(options: &FilterOptions, theme: Arc<ColorTheme>) -> Self;

    /// Render the widget to the buffer
    fn render(&mut self, area: Rect, buf: &mut Buffer);
}
