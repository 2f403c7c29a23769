use crate::exhaustive_match;
use crossterm::event::KeyEvent;

/// Events driving the filter loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Quit the loop, the outcome is already decided
    Quit,
    /// An error occurred in the input pump
    Error(String),
    /// Render the UI
    Render,
    /// A key was pressed
    Key(KeyEvent),
    /// Text was pasted (bracketed paste)
    Paste(String),
    /// The terminal was resized to (width, height)
    Resize(u16, u16),
    /// An action was triggered
    Action(Action),
}

/// Actions that can be bound to keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave without a selection, as an interruption
    Abort,
    /// Submit the selection
    Accept,
    /// Add a character to the query
    AddChar(char),
    /// Move cursor backward one character
    BackwardChar,
    /// Delete character before cursor
    BackwardDeleteChar,
    /// Delete word before cursor
    BackwardKillWord,
    /// Move cursor backward one word
    BackwardWord,
    /// Move cursor to beginning of line
    BeginningOfLine,
    /// Delete character under cursor
    DeleteChar,
    /// Deselect all items
    DeselectAll,
    /// Move the list cursor one line down on screen
    Down,
    /// Move cursor to end of line
    EndOfLine,
    /// Move cursor forward one character
    ForwardChar,
    /// Move cursor forward one word
    ForwardWord,
    /// Ignore the key
    Ignore,
    /// Delete from cursor to end of line
    KillLine,
    /// Delete word after cursor
    KillWord,
    /// Leave without a selection
    Quit,
    /// Select all items up to the limit
    SelectAll,
    /// Toggle selection of the current item
    Toggle,
    /// Select all, or deselect all once everything possible is selected
    ToggleAll,
    /// Toggle then move down
    ToggleDown,
    /// Toggle then move up
    ToggleUp,
    /// Delete from the cursor to the beginning of the line
    UnixLineDiscard,
    /// Delete the whitespace-delimited word before the cursor
    UnixWordRubout,
    /// Move the list cursor one line up on screen
    Up,
}

/// Parses an action string into an Action enum
///
/// Only `add-char` takes an argument, written `add-char(x)` or `add-char:x`.
pub fn parse_action(raw_action: &str) -> Option<Action> {
    let (action, arg) = match raw_action.split_once([':', '(']) {
        None => (raw_action, None),
        Some((act, a)) => (act, Some(a.strip_suffix(')').unwrap_or(a))),
    };
    trace!("parse_action: action={action}, arg={arg:?}");

    exhaustive_match! {
        action => Option<Action>;
        {
            "abort" => Some(Abort),
            "accept" => Some(Accept),
            "add-char" => Some(AddChar(arg.and_then(|s| s.chars().next())?)),
            "backward-char" => Some(BackwardChar),
            "backward-delete-char" => Some(BackwardDeleteChar),
            "backward-kill-word" => Some(BackwardKillWord),
            "backward-word" => Some(BackwardWord),
            "beginning-of-line" => Some(BeginningOfLine),
            "delete-char" => Some(DeleteChar),
            "deselect-all" => Some(DeselectAll),
            "down" | "next" => Some(Down),
            "end-of-line" => Some(EndOfLine),
            "forward-char" => Some(ForwardChar),
            "forward-word" => Some(ForwardWord),
            "ignore" => Some(Ignore),
            "kill-line" => Some(KillLine),
            "kill-word" => Some(KillWord),
            "quit" => Some(Quit),
            "select-all" => Some(SelectAll),
            "toggle" => Some(Toggle),
            "toggle-all" => Some(ToggleAll),
            "toggle-down" => Some(ToggleDown),
            "toggle-up" => Some(ToggleUp),
            "unix-line-discard" => Some(UnixLineDiscard),
            "unix-word-rubout" => Some(UnixWordRubout),
            "up" | "previous" => Some(Up),
        }
        default _ => None
    }
}
