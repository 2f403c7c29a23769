//! Key binding configuration and parsing.
//!
//! Keys are written `[ctrl-][alt-][shift-]KEY` and bound with
//! `KEY:ACTION[+ACTION...]`, several bindings separated by commas.

use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

use crate::tui::event::{self, Action};

/// Errors raised while parsing `--bind` values
#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyParseError {
    /// The key or binding was empty
    #[error("cannot parse an empty key")]
    Empty,
    /// A modifier other than ctrl, alt or shift
    #[error("failed to parse {0:?} as key modifier")]
    UnknownModifier(String),
    /// The key name is not known
    #[error("unknown key {0:?}")]
    UnknownKey(String),
    /// The binding has no `:` between key and actions
    #[error("failed to parse {0:?} as key and action")]
    MissingSeparator(String),
    /// None of the chained actions is known
    #[error("empty action chain or unknown action {0:?}")]
    UnknownAction(String),
}

/// A map of key events to their associated actions
#[derive(Clone, Debug, PartialEq)]
pub struct KeyMap(pub HashMap<KeyEvent, Vec<Action>>);

impl Deref for KeyMap {
    type Target = HashMap<KeyEvent, Vec<Action>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for KeyMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<&str> for KeyMap {
    fn from(value: &str) -> Self {
        parse_keymaps(value.split(','))
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        get_default_key_map()
    }
}

impl KeyMap {
    /// Adds keymaps from the source, parsing them using parse_keymap
    pub fn add_keymaps<'a, T>(&mut self, source: T)
    where
        T: Iterator<Item = &'a str>,
    {
        for map in source {
            match parse_keymap(map).and_then(|(key, action_chain)| self.bind(key, action_chain)) {
                Ok(()) => (),
                Err(err) => warn!("ignoring binding {map:?}: {err}"),
            }
        }
    }

    fn bind(&mut self, key: &str, action_chain: Vec<Action>) -> Result<(), KeyParseError> {
        let key = parse_key(key)?;
        self.insert(key, action_chain);
        Ok(())
    }
}

/// Returns the default key bindings
#[rustfmt::skip]
pub fn get_default_key_map() -> KeyMap {
    let mut ret = HashMap::new();

    ret.insert(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), vec![Action::Down]);
    ret.insert(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE), vec![Action::Up]);
    ret.insert(KeyEvent::new(KeyCode::End, KeyModifiers::NONE), vec![Action::EndOfLine]);
    ret.insert(KeyEvent::new(KeyCode::Home, KeyModifiers::NONE), vec![Action::BeginningOfLine]);
    ret.insert(KeyEvent::new(KeyCode::Delete, KeyModifiers::NONE), vec![Action::DeleteChar]);
    ret.insert(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE), vec![Action::ToggleDown]);
    ret.insert(KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE), vec![Action::ToggleUp]);
    ret.insert(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), vec![Action::ToggleUp]);
    ret.insert(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), vec![Action::Quit]);
    ret.insert(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), vec![Action::Accept]);
    ret.insert(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE), vec![Action::BackwardChar]);
    ret.insert(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE), vec![Action::ForwardChar]);
    ret.insert(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE), vec![Action::BackwardDeleteChar]);

    ret.insert(KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL), vec![Action::BackwardWord]);
    ret.insert(KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL), vec![Action::ForwardWord]);

    ret.insert(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::CONTROL), vec![Action::Toggle]);
    ret.insert(KeyEvent::new(KeyCode::Char('@'), KeyModifiers::CONTROL), vec![Action::Toggle]);
    ret.insert(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL), vec![Action::ToggleAll]);
    ret.insert(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL), vec![Action::BackwardChar]);
    ret.insert(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), vec![Action::Abort]);
    ret.insert(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL), vec![Action::EndOfLine]);
    ret.insert(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL), vec![Action::ForwardChar]);
    ret.insert(KeyEvent::new(KeyCode::Char('h'), KeyModifiers::CONTROL), vec![Action::BackwardDeleteChar]);
    ret.insert(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL), vec![Action::Down]);
    ret.insert(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL), vec![Action::Up]);
    ret.insert(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL), vec![Action::Down]);
    ret.insert(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL), vec![Action::Up]);
    ret.insert(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL), vec![Action::Accept]);
    ret.insert(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL), vec![Action::UnixLineDiscard]);
    ret.insert(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL), vec![Action::UnixWordRubout]);

    ret.insert(KeyEvent::new(KeyCode::Backspace, KeyModifiers::ALT), vec![Action::BackwardKillWord]);

    ret.insert(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::ALT), vec![Action::BackwardWord]);
    ret.insert(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::ALT), vec![Action::KillWord]);
    ret.insert(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::ALT), vec![Action::ForwardWord]);

    KeyMap(ret)
}

/// Parses a key str into a crossterm KeyEvent
pub fn parse_key(key: &str) -> Result<KeyEvent, KeyParseError> {
    if key.is_empty() {
        return Err(KeyParseError::Empty);
    }
    let (mod_strs, key) = match key.rsplit_once('-') {
        // a trailing '-' is the minus key itself
        Some((mods, "")) => (mods.strip_suffix('-').unwrap_or(mods), "-"),
        Some((mods, key)) => (mods, key),
        None => ("", key),
    };

    let mut mods = KeyModifiers::NONE;
    for mod_str in mod_strs.split('-').filter(|s| !s.is_empty()) {
        mods |= match mod_str {
            "ctrl" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            s => return Err(KeyParseError::UnknownModifier(s.to_string())),
        }
    }

    let mut chars = key.chars();
    let keycode = match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_uppercase() => {
            mods |= KeyModifiers::SHIFT;
            KeyCode::Char(c.to_lowercase().next().unwrap_or(c))
        }
        (Some(c), None) => KeyCode::Char(c),
        _ => match key.to_lowercase().as_str() {
            "space" => KeyCode::Char(' '),
            "enter" | "return" => KeyCode::Enter,
            "bspace" | "bs" | "backspace" => KeyCode::Backspace,
            "del" | "delete" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "tab" => KeyCode::Tab,
            "btab" => KeyCode::BackTab,
            "esc" => KeyCode::Esc,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pgup" => KeyCode::PageUp,
            "pgdn" | "pgdown" => KeyCode::PageDown,
            s => match s.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                Some(n) => KeyCode::F(n),
                None => return Err(KeyParseError::UnknownKey(key.to_string())),
            },
        },
    };

    Ok(KeyEvent::new(keycode, mods))
}

/// Parse an iterator of keymaps on top of the default KeyMap
pub fn parse_keymaps<'a, T>(maps: T) -> KeyMap
where
    T: Iterator<Item = &'a str>,
{
    let mut res = KeyMap::default();
    res.add_keymaps(maps);
    res
}

/// Parses an action chain, separated by '+'s into the corresponding actions
///
/// Unknown actions are skipped; the chain fails only when nothing is left.
pub fn parse_action_chain(action_chain: &str) -> Result<Vec<Action>, KeyParseError> {
    let actions: Vec<Action> = action_chain
        .split('+')
        .filter_map(|s| {
            let action = event::parse_action(s);
            if action.is_none() {
                debug!("unknown action {s:?}");
            }
            action
        })
        .collect();
    if actions.is_empty() {
        Err(KeyParseError::UnknownAction(action_chain.to_string()))
    } else {
        Ok(actions)
    }
}

/// Parse a single keymap and return the key and action(s)
pub fn parse_keymap(key_action: &str) -> Result<(&str, Vec<Action>), KeyParseError> {
    if key_action.is_empty() {
        return Err(KeyParseError::Empty);
    }
    debug!("got key_action: {key_action:?}");
    // the key itself may be ':'
    let split = match key_action.strip_prefix("::") {
        Some(chain) => Some((":", chain)),
        None => key_action.split_once(':'),
    };
    let (key, action_chain) = split.ok_or_else(|| KeyParseError::MissingSeparator(key_action.to_string()))?;
    Ok((key, parse_action_chain(action_chain)?))
}
