use std::sync::Arc;

use color_eyre::eyre::{Result, bail};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyEvent, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::widgets::Widget;

use super::event::Action;
use super::header::Header;
use super::help::Help;
use super::input::Input;
use super::item_list::ItemList;
use super::widget::FilterWidget;
use super::{Event, Tui};
use crate::matcher::Matcher;
use crate::options::FilterOptions;
use crate::output::Outcome;
use crate::selection::SelectionSet;
use crate::theme::ColorTheme;
use crate::tui::options::TuiLayout;

/// Rows taken by the query line
const INPUT_HEIGHT: u16 = 1;

/// Application state for the filter UI
///
/// Owns the candidates and every piece of session state. Each event is settled
/// completely (query, matches, cursor, viewport, selection) before the next
/// frame is drawn.
pub struct App {
    /// The candidates, in input order
    pub candidates: Vec<Arc<str>>,
    /// Turns the query into matches
    pub matcher: Matcher,
    /// Query entry field
    pub input: Input,
    /// Header label
    pub header: Header,
    /// Key help line
    pub help: Help,
    /// Matches, cursor, viewport and selection
    pub item_list: ItemList,
    /// Color theme
    pub theme: Arc<ColorTheme>,
    /// Configuration options
    pub options: FilterOptions,
    /// Set once the session is decided
    pub outcome: Option<Outcome>,
    /// Whether the event loop should stop
    pub should_quit: bool,
    /// Terminal cursor position, on the query line
    pub cursor_pos: (u16, u16),
}

impl App {
    /// Builds the session from options and candidates and runs the initial query
    pub fn from_options(options: FilterOptions, theme: Arc<ColorTheme>, candidates: Vec<String>) -> Self {
        let candidates: Vec<Arc<str>> = candidates.into_iter().map(Arc::from).collect();
        let limit = options.effective_limit(candidates.len());

        let mut item_list = ItemList::from_options(&options, theme.clone());
        item_list.selection = SelectionSet::new(limit);
        if item_list.selection.is_multi() {
            for text in options.pre_selected() {
                if let Some(candidate) = candidates.iter().find(|c| c.as_ref() == text) {
                    item_list.selection.select(candidate);
                }
            }
        }
        let mut help = Help::from_options(&options, theme.clone());
        help.multi = limit > 1;

        let mut app = Self {
            matcher: Matcher::from_options(&options),
            input: Input::from_options(&options, theme.clone()),
            header: Header::from_options(&options, theme.clone()),
            help,
            item_list,
            candidates,
            theme,
            options,
            outcome: None,
            should_quit: false,
            cursor_pos: (0, 0),
        };
        app.rematch();
        app
    }

    /// Rows taken by everything but the list
    pub fn chrome_height(&self) -> u16 {
        INPUT_HEIGHT + self.header.height() + self.help.height()
    }

    /// Recomputes the viewport for a terminal of `width` x `height`.
    ///
    /// The list gets what the chrome leaves, capped by a configured height.
    pub fn resize(&mut self, width: u16, height: u16) {
        let mut list_height = height.saturating_sub(self.chrome_height());
        if self.options.height > 0 {
            list_height = list_height.min(self.options.height);
        }
        debug!("resize to {width}x{height}, list height {list_height}");
        self.item_list.resize(width, list_height);
    }

    /// Decides the session and asks the loop to stop
    fn finish(&mut self, outcome: Outcome) -> Vec<Event> {
        debug!("outcome: {outcome:?}");
        self.outcome = Some(outcome);
        vec![Event::Quit]
    }

    /// What submitting right now would return
    pub fn submission(&self) -> Vec<String> {
        if self.item_list.selection.is_multi() {
            self.item_list.selection.to_vec()
        } else {
            self.item_list
                .selected()
                .map(|item| vec![item.text.to_string()])
                .unwrap_or_default()
        }
    }

    /// Reruns the matcher against the current query
    fn rematch(&mut self) {
        let matches = self.matcher.run(&self.input.value, &self.candidates);
        self.item_list.set_items(matches);
    }

    fn on_query_changed(&mut self) -> Result<Vec<Event>> {
        self.rematch();
        Ok(vec![Event::Render])
    }

    /// Handles a TUI event and updates application state
    pub fn handle_event<B: Backend>(&mut self, tui: &mut Tui<B>, event: &Event) -> Result<()>
    where
        B::Error: Send + Sync + 'static,
    {
        match event {
            Event::Render => {
                tui.draw(|f| {
                    f.render_widget(&mut *self, f.area());
                    f.set_cursor_position(Position::from(self.cursor_pos));
                })?;
            }
            Event::Quit => {
                tui.exit()?;
                self.should_quit = true;
            }
            Event::Error(msg) => {
                tui.exit()?;
                bail!(msg.to_owned());
            }
            Event::Action(act) => {
                let events = self.handle_action(act)?;
                for evt in events {
                    tui.event_tx.send(evt)?;
                }
            }
            Event::Key(key) => {
                let events = self.handle_key(key);
                for evt in events {
                    tui.event_tx.send(evt)?;
                }
            }
            Event::Paste(text) => {
                self.input.insert_str(text);
                for evt in self.on_query_changed()? {
                    tui.event_tx.send(evt)?;
                }
            }
            Event::Resize(width, height) => {
                self.resize(*width, *height);
                tui.event_tx.send(Event::Render)?;
            }
        };

        Ok(())
    }

    /// Maps a key to the events it triggers
    pub fn handle_key(&mut self, key: &KeyEvent) -> Vec<Event> {
        debug!("key event: {:?}", key);

        if let Some(act) = self.options.keymap.get(key) {
            debug!("{act:?}");
            return act.iter().map(|a| Event::Action(a.clone())).collect();
        }
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, Char(c)) => vec![Event::Action(Action::AddChar(c))],
            (KeyModifiers::SHIFT, Char(c)) => {
                vec![Event::Action(Action::AddChar(c.to_uppercase().next().unwrap_or(c)))]
            }
            _ => vec![],
        }
    }

    /// Applies an action to the session state
    pub fn handle_action(&mut self, act: &Action) -> Result<Vec<Event>> {
        use Action::*;
        let multi = self.item_list.selection.is_multi();
        match act {
            Abort => return Ok(self.finish(Outcome::Aborted)),
            Quit => return Ok(self.finish(Outcome::QuitEmpty)),
            Accept => {
                let selected = self.submission();
                return Ok(self.finish(Outcome::Submitted(selected)));
            }
            AddChar(c) => {
                self.input.insert(*c);
                return self.on_query_changed();
            }
            BackwardChar => self.input.move_left(),
            BackwardDeleteChar => {
                if self.input.delete_backward().is_some() {
                    return self.on_query_changed();
                }
            }
            BackwardKillWord => {
                if !self.input.delete_backward_word().is_empty() {
                    return self.on_query_changed();
                }
            }
            BackwardWord => self.input.move_cursor_backward_word(),
            BeginningOfLine => self.input.move_to_start(),
            DeleteChar => {
                if self.input.delete_forward().is_some() {
                    return self.on_query_changed();
                }
            }
            DeselectAll => {
                if multi {
                    self.item_list.selection.deselect_all();
                }
            }
            Down => self.item_list.down(),
            EndOfLine => self.input.move_to_end(),
            ForwardChar => self.input.move_right(),
            ForwardWord => self.input.move_cursor_forward_word(),
            Ignore => return Ok(vec![]),
            KillLine => {
                if !self.input.delete_to_end().is_empty() {
                    return self.on_query_changed();
                }
            }
            KillWord => {
                if !self.input.delete_forward_word().is_empty() {
                    return self.on_query_changed();
                }
            }
            SelectAll => {
                if multi {
                    self.item_list.select_all();
                }
            }
            Toggle => {
                if multi {
                    self.item_list.toggle();
                }
            }
            ToggleAll => {
                if multi {
                    self.item_list.toggle_all();
                }
            }
            ToggleDown => {
                if multi {
                    self.item_list.toggle();
                    self.item_list.down();
                }
            }
            ToggleUp => {
                if multi {
                    self.item_list.toggle();
                    self.item_list.up();
                }
            }
            UnixLineDiscard => {
                if !self.input.delete_to_beginning().is_empty() {
                    return self.on_query_changed();
                }
            }
            UnixWordRubout => {
                if !self.input.delete_backward_to_whitespace().is_empty() {
                    return self.on_query_changed();
                }
            }
            Up => self.item_list.up(),
        }
        self.item_list.clamp_cursor();
        Ok(vec![Event::Render])
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let list_height = Constraint::Length(self.item_list.viewport().height);
        let header = Constraint::Length(self.header.height());
        let input = Constraint::Length(INPUT_HEIGHT);
        let help = Constraint::Length(self.help.height());

        let (header_area, input_area, list_area, help_area) = match self.options.layout() {
            TuiLayout::Forward => {
                let [header_area, input_area, list_area, help_area, _] =
                    Layout::vertical([header, input, list_height, help, Constraint::Fill(1)]).areas(area);
                (header_area, input_area, list_area, help_area)
            }
            TuiLayout::Reverse => {
                let [_, list_area, input_area, help_area, header_area] =
                    Layout::vertical([Constraint::Fill(1), list_height, input, help, header]).areas(area);
                (header_area, input_area, list_area, help_area)
            }
        };

        self.header.render(header_area, buf);
        self.input.render(input_area, buf);
        self.item_list.render(list_area, buf);
        self.help.render(help_area, buf);

        self.cursor_pos = (
            (input_area.x + self.input.cursor_pos()).min(input_area.right().saturating_sub(1)),
            input_area.y,
        );
    }
}
