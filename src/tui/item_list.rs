use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Widget};

use crate::{
    item::MatchedItem,
    options::FilterOptions,
    selection::SelectionSet,
    theme::ColorTheme,
    tui::options::TuiLayout,
    tui::widget::FilterWidget,
    util::{clamp, str_width},
};

/// Visible window over the rendered lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Number of visible lines
    pub height: u16,
    /// Width in cells
    pub width: u16,
    /// Index of the first visible line
    pub y_offset: usize,
}

/// Widget for displaying and navigating the list of matches
///
/// The cursor always indexes `items` (0 when empty). In reverse layout the
/// item at index `i` is drawn on line `N-1-i`, after the blank padding that
/// keeps a short list at the bottom.
pub struct ItemList {
    pub(crate) items: Vec<MatchedItem>,
    pub selection: SelectionSet,
    pub(crate) current: usize,
    pub(crate) viewport: Viewport,
    pub(crate) layout: TuiLayout,
    pub(crate) theme: Arc<ColorTheme>,
    indicator: String,
    selected_prefix: String,
    unselected_prefix: String,
}

impl Default for ItemList {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selection: SelectionSet::new(1),
            current: 0,
            viewport: Viewport::default(),
            layout: TuiLayout::default(),
            theme: Arc::new(ColorTheme::default()),
            indicator: String::from("•"),
            selected_prefix: String::from(" ◉ "),
            unselected_prefix: String::from(" ○ "),
        }
    }
}

impl ItemList {
    /// Number of matches
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// The matches, in match order
    pub fn items(&self) -> &[MatchedItem] {
        &self.items
    }

    /// Cursor index into the matches
    pub fn cursor(&self) -> usize {
        self.current
    }

    /// The viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The match under the cursor, if any
    pub fn selected(&self) -> Option<&MatchedItem> {
        self.items.get(self.current)
    }

    fn height(&self) -> usize {
        self.viewport.height as usize
    }

    fn max_offset(&self) -> usize {
        self.items.len().saturating_sub(self.height())
    }

    /// Sets `y_offset`, clamped into `[0, max(0, N-height)]`
    pub fn set_y_offset(&mut self, y_offset: usize) {
        self.viewport.y_offset = y_offset.min(self.max_offset());
    }

    fn line_down(&mut self) {
        self.set_y_offset(self.viewport.y_offset + 1);
    }

    fn line_up(&mut self) {
        self.set_y_offset(self.viewport.y_offset.saturating_sub(1));
    }

    fn goto_top(&mut self) {
        self.viewport.y_offset = 0;
    }

    fn goto_bottom(&mut self) {
        self.set_y_offset(self.max_offset());
    }

    /// Re-clamps the cursor into `[0, N-1]`, 0 when empty
    pub fn clamp_cursor(&mut self) {
        self.current = self.current.min(self.items.len().saturating_sub(1));
    }

    /// Replaces the matches after the query changed.
    ///
    /// In reverse layout the distance between the viewport and the bottom of
    /// the list is kept.
    pub fn set_items(&mut self, items: Vec<MatchedItem>) {
        let old_count = self.items.len() as i64;
        let from_bottom = (old_count - self.viewport.y_offset as i64).max(0);
        self.items = items;

        let new_count = self.items.len() as i64;
        if self.layout.is_reverse() {
            let y_offset = clamp(0, (new_count - self.height() as i64).max(0), new_count - from_bottom);
            self.set_y_offset(y_offset as usize);
        } else {
            self.set_y_offset(self.viewport.y_offset);
        }
        self.clamp_cursor();
        trace!(
            "items: {} matches, cursor {}, y_offset {}",
            self.items.len(),
            self.current,
            self.viewport.y_offset
        );
    }

    /// Sets the viewport size. Reverse layout pins the view to the bottom.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport.width = width;
        self.viewport.height = height;
        if self.layout.is_reverse() {
            let count = self.items.len() as i64;
            let y_offset = clamp(0, count, count - height as i64);
            self.set_y_offset(y_offset as usize);
        } else {
            self.set_y_offset(self.viewport.y_offset);
        }
    }

    /// Moves one line down on screen
    pub fn down(&mut self) {
        match self.layout {
            TuiLayout::Forward => self.move_next(),
            TuiLayout::Reverse => self.move_previous(),
        }
    }

    /// Moves one line up on screen
    pub fn up(&mut self) {
        match self.layout {
            TuiLayout::Forward => self.move_previous(),
            TuiLayout::Reverse => self.move_next(),
        }
    }

    /// Moves to the next match, wrapping around, and scrolls to follow
    pub fn move_next(&mut self) {
        let count = self.items.len();
        if count == 0 {
            return;
        }
        self.current = (self.current + 1) % count;
        let (y_offset, height) = (self.viewport.y_offset, self.height());
        match self.layout {
            TuiLayout::Forward => {
                if self.current >= y_offset + height {
                    self.line_down();
                }
                if self.current < y_offset {
                    self.goto_top();
                }
            }
            TuiLayout::Reverse => {
                let from_bottom = count - self.current;
                if from_bottom <= y_offset {
                    self.line_up();
                }
                if from_bottom > height + y_offset {
                    self.goto_bottom();
                }
            }
        }
    }

    /// Moves to the previous match, wrapping around, and scrolls to follow
    pub fn move_previous(&mut self) {
        let count = self.items.len();
        if count == 0 {
            return;
        }
        self.current = (self.current + count - 1) % count;
        let (y_offset, height) = (self.viewport.y_offset, self.height());
        match self.layout {
            TuiLayout::Forward => {
                if self.current < y_offset {
                    self.line_up();
                }
                if self.current >= y_offset + height {
                    self.goto_bottom();
                }
            }
            TuiLayout::Reverse => {
                let from_bottom = count - self.current;
                if from_bottom > height + y_offset {
                    self.line_down();
                }
                if from_bottom <= y_offset {
                    self.goto_top();
                }
            }
        }
    }

    /// Toggles the selection of the current match
    pub fn toggle(&mut self) {
        if let Some(item) = self.items.get(self.current) {
            self.selection.toggle(&item.text);
        }
    }

    /// Applies the toggle-all rule to the current matches
    pub fn toggle_all(&mut self) {
        self.selection.toggle_all(&self.items);
    }

    /// Selects the current matches up to the limit
    pub fn select_all(&mut self) {
        self.selection.select_all(&self.items);
    }

    /// Every rendered line, padding included, before viewport clipping
    pub fn lines(&self) -> Vec<Line<'static>> {
        let count = self.items.len();
        let mut lines = Vec::with_capacity(count.max(self.height()));
        let indicator_padding = " ".repeat(str_width(&self.indicator));

        let ordered: Box<dyn Iterator<Item = (usize, &MatchedItem)>> = if self.layout.is_reverse() {
            lines.resize(self.height().saturating_sub(count), Line::default());
            Box::new(self.items.iter().enumerate().rev())
        } else {
            Box::new(self.items.iter().enumerate())
        };

        for (index, item) in ordered {
            let is_current = index == self.current;
            let mut spans = Vec::with_capacity(4);
            spans.push(if is_current {
                Span::styled(self.indicator.clone(), self.theme.cursor)
            } else {
                Span::raw(indicator_padding.clone())
            });
            spans.push(if self.selection.contains(item.text()) {
                Span::styled(self.selected_prefix.clone(), self.theme.selected)
            } else if self.selection.is_multi() {
                Span::styled(self.unselected_prefix.clone(), self.theme.unselected)
            } else {
                Span::raw(" ")
            });

            let (base, matched) = if is_current {
                (self.theme.current, self.theme.current_match)
            } else {
                (self.theme.normal, self.theme.matched)
            };
            spans.extend(highlight(item, base, base.patch(matched)));
            lines.push(Line::from(spans));
        }
        lines
    }

    /// Lines inside the viewport
    pub fn visible_lines(&self) -> Vec<Line<'static>> {
        self.lines()
            .into_iter()
            .skip(self.viewport.y_offset)
            .take(self.height())
            .collect()
    }
}

/// Splits the item text into runs of matched and unmatched characters.
/// Positions past the end of the text are ignored.
fn highlight(item: &MatchedItem, base: Style, matched: Style) -> Vec<Span<'static>> {
    let text = item.text();
    let mut mask = vec![false; text.chars().count()];
    for &idx in &item.matched_indices {
        if let Some(slot) = mask.get_mut(idx) {
            *slot = true;
        }
    }

    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_matched = false;
    for (ch, is_matched) in text.chars().zip(mask) {
        if is_matched != run_matched && !run.is_empty() {
            let style = if run_matched { matched } else { base };
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        run_matched = is_matched;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, if run_matched { matched } else { base }));
    }
    spans
}

impl FilterWidget for ItemList {
    fn from_options(options: &FilterOptions, theme: Arc<ColorTheme>) -> Self {
        Self {
            selection: SelectionSet::new(options.limit),
            layout: options.layout(),
            theme,
            indicator: options.indicator.clone(),
            selected_prefix: options.selected_prefix.clone(),
            unselected_prefix: options.unselected_prefix.clone(),
            ..Default::default()
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        Widget::render(Clear, area, buf);
        Paragraph::new(self.visible_lines())
            .style(self.theme.normal)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::match_all;

    fn list(layout: TuiLayout, count: usize, height: u16) -> ItemList {
        let texts: Vec<Arc<str>> = (0..count).map(|i| Arc::from(format!("item{i}"))).collect();
        let mut list = ItemList {
            layout,
            ..Default::default()
        };
        list.set_items(match_all(&texts));
        list.resize(20, height);
        list
    }

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn forward_scrolls_down_and_wraps_to_top() {
        let mut list = list(TuiLayout::Forward, 5, 3);
        list.down();
        list.down();
        assert_eq!((list.cursor(), list.viewport().y_offset), (2, 0));
        list.down();
        assert_eq!((list.cursor(), list.viewport().y_offset), (3, 1));
        list.down();
        assert_eq!((list.cursor(), list.viewport().y_offset), (4, 2));
        list.down();
        assert_eq!((list.cursor(), list.viewport().y_offset), (0, 0));
    }

    #[test]
    fn forward_up_wraps_to_bottom() {
        let mut list = list(TuiLayout::Forward, 5, 3);
        list.up();
        assert_eq!((list.cursor(), list.viewport().y_offset), (4, 2));
        list.up();
        list.up();
        assert_eq!((list.cursor(), list.viewport().y_offset), (2, 2));
        list.up();
        assert_eq!((list.cursor(), list.viewport().y_offset), (1, 1));
    }

    #[test]
    fn reverse_starts_at_bottom() {
        let list = list(TuiLayout::Reverse, 5, 3);
        assert_eq!(list.viewport().y_offset, 2);
        let lines = list.visible_lines();
        assert_eq!(
            lines.iter().map(plain).collect::<Vec<_>>(),
            vec!["  item2", "  item1", "• item0"]
        );
    }

    #[test]
    fn reverse_up_scrolls_and_wraps() {
        let mut list = list(TuiLayout::Reverse, 5, 3);
        list.up();
        list.up();
        assert_eq!((list.cursor(), list.viewport().y_offset), (2, 2));
        list.up();
        assert_eq!((list.cursor(), list.viewport().y_offset), (3, 1));
        list.up();
        assert_eq!((list.cursor(), list.viewport().y_offset), (4, 0));
        list.up();
        assert_eq!((list.cursor(), list.viewport().y_offset), (0, 2));
    }

    #[test]
    fn reverse_down_wraps_to_top() {
        let mut list = list(TuiLayout::Reverse, 5, 3);
        list.down();
        assert_eq!((list.cursor(), list.viewport().y_offset), (4, 0));
        list.down();
        list.down();
        assert_eq!((list.cursor(), list.viewport().y_offset), (2, 0));
        list.down();
        assert_eq!((list.cursor(), list.viewport().y_offset), (1, 1));
    }

    #[test]
    fn n_steps_return_to_start() {
        for layout in [TuiLayout::Forward, TuiLayout::Reverse] {
            let mut list = list(layout, 7, 3);
            list.down();
            list.down();
            let start = list.cursor();
            for _ in 0..7 {
                list.move_next();
                assert!(list.cursor() < 7);
            }
            assert_eq!(list.cursor(), start);
            for _ in 0..7 {
                list.move_previous();
            }
            assert_eq!(list.cursor(), start);
        }
    }

    #[test]
    fn empty_list_is_inert() {
        let mut list = list(TuiLayout::Forward, 0, 3);
        list.down();
        list.up();
        list.toggle();
        assert_eq!((list.cursor(), list.viewport().y_offset), (0, 0));
        assert!(list.selected().is_none());
        assert!(list.lines().is_empty());
    }

    #[test]
    fn reverse_pads_short_lists() {
        let list = list(TuiLayout::Reverse, 1, 3);
        let lines = list.visible_lines();
        assert_eq!(lines.iter().map(plain).collect::<Vec<_>>(), vec!["", "", "• item0"]);
    }

    #[test]
    fn reverse_text_change_keeps_distance_from_bottom() {
        let mut list = list(TuiLayout::Reverse, 10, 3);
        list.set_y_offset(4);
        let texts: Vec<Arc<str>> = (0..8).map(|i| Arc::from(format!("x{i}"))).collect();
        list.set_items(match_all(&texts));
        // 6 lines from the bottom before, so 8 - 6
        assert_eq!(list.viewport().y_offset, 2);

        list.set_items(match_all(&texts[..2]));
        assert_eq!(list.viewport().y_offset, 0);
    }

    #[test]
    fn cursor_is_clamped_after_text_change() {
        let mut list = list(TuiLayout::Forward, 5, 3);
        list.up();
        assert_eq!(list.cursor(), 4);
        let texts: Vec<Arc<str>> = vec![Arc::from("a"), Arc::from("b")];
        list.set_items(match_all(&texts));
        assert_eq!(list.cursor(), 1);
        assert_eq!(list.viewport().y_offset, 0);
    }

    #[test]
    fn prefixes_follow_selection() {
        let mut list = list(TuiLayout::Forward, 3, 3);
        list.selection = SelectionSet::new(2);
        list.toggle();
        let lines: Vec<String> = list.lines().iter().map(plain).collect();
        assert_eq!(lines, vec!["• ◉ item0", "  ○ item1", "  ○ item2"]);
    }

    #[test]
    fn highlight_splits_runs_and_ignores_out_of_range() {
        let item = MatchedItem {
            text: Arc::from("apple"),
            index: 0,
            matched_indices: vec![0, 1, 4, 9],
            score: 0,
        };
        let base = Style::default();
        let matched = Style::default().bold();
        let spans = highlight(&item, base, matched);
        assert_eq!(
            spans,
            vec![
                Span::styled("ap", matched),
                Span::styled("pl", base),
                Span::styled("e", matched),
            ]
        );
    }
}
