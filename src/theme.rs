//! Handle the color theme
use ratatui::style::{Color, Modifier, Style};

use crate::options::FilterOptions;

/// The color scheme of sift's UI
///
/// <pre>
/// +---------------------+
/// | header              |  --> header
/// | > query             |  --> prompt & query (placeholder when empty)
/// | •  ○ current line   |  --> cursor & unselected & current & current_match
/// |    ◉ selected line  |  --> selected & normal & matched
/// |                     |
/// | ↓↑ navigate • ...   |  --> help
/// +---------------------+
/// </pre>
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ColorTheme {
    /// Non-current lines
    pub normal: Style,
    /// Matched text on non-current lines
    pub matched: Style,
    /// Current line, non-matched text
    pub current: Style,
    /// Current line, matched text
    pub current_match: Style,
    /// Query text
    pub query: Style,
    /// Placeholder shown while the query is empty
    pub placeholder: Style,
    /// Prompt prefix
    pub prompt: Style,
    /// Cursor indicator
    pub cursor: Style,
    /// Prefix of selected lines
    pub selected: Style,
    /// Prefix of unselected lines in multi-select
    pub unselected: Style,
    /// Header lines
    pub header: Style,
    /// Help line
    pub help: Style,
}

impl ColorTheme {
    /// Setup the theme from the options, honoring `NO_COLOR`
    pub fn init_from_options(options: &FilterOptions) -> ColorTheme {
        if let Some(color) = options.color.as_deref() {
            ColorTheme::from_options(color)
        } else {
            match std::env::var_os("NO_COLOR") {
                Some(no_color) if !no_color.is_empty() => ColorTheme::none(),
                _ => ColorTheme::dark256(),
            }
        }
    }

    fn none() -> Self {
        Self {
            placeholder: Style::default().dim(),
            ..ColorTheme::default()
        }
    }

    fn bw() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.underlined(),
            current: base.current.reversed(),
            current_match: base.current_match.reversed().underlined(),
            cursor: base.cursor.bold(),
            selected: base.selected.bold(),
            ..base
        }
    }

    fn default16() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.fg(Color::Magenta),
            current: base.current.fg(Color::Yellow),
            current_match: base.current_match.fg(Color::Magenta),
            prompt: base.prompt.fg(Color::DarkGray),
            cursor: base.cursor.fg(Color::Magenta),
            selected: base.selected.fg(Color::Magenta),
            unselected: base.unselected.fg(Color::DarkGray),
            header: base.header.fg(Color::Blue),
            help: base.help.fg(Color::DarkGray),
            ..base
        }
    }

    fn dark256() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.fg(Color::Indexed(212)),
            current: base.current.bg(Color::Indexed(236)),
            current_match: base.current_match.fg(Color::Indexed(212)).bg(Color::Indexed(236)),
            prompt: base.prompt.fg(Color::Indexed(240)),
            placeholder: base.placeholder.fg(Color::Indexed(240)),
            cursor: base.cursor.fg(Color::Indexed(212)),
            selected: base.selected.fg(Color::Indexed(212)),
            unselected: base.unselected.fg(Color::Indexed(240)),
            header: base.header.fg(Color::Indexed(99)),
            help: base.help.fg(Color::Indexed(241)),
            ..base
        }
    }

    fn light256() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.fg(Color::Indexed(162)),
            current: base.current.bg(Color::Indexed(254)),
            current_match: base.current_match.fg(Color::Indexed(162)).bg(Color::Indexed(254)),
            prompt: base.prompt.fg(Color::Indexed(245)),
            placeholder: base.placeholder.fg(Color::Indexed(248)),
            cursor: base.cursor.fg(Color::Indexed(162)),
            selected: base.selected.fg(Color::Indexed(162)),
            unselected: base.unselected.fg(Color::Indexed(248)),
            header: base.header.fg(Color::Indexed(57)),
            help: base.help.fg(Color::Indexed(246)),
            ..base
        }
    }

    fn set_color(&mut self, name: &str, spec: &str) {
        let spec_parts: Vec<_> = spec.split(&['+', ':']).collect();

        let raw_color = spec_parts[0];
        let new_color = if raw_color.len() == 7 && raw_color.starts_with('#') {
            let r = u8::from_str_radix(&raw_color[1..3], 16).unwrap_or(255);
            let g = u8::from_str_radix(&raw_color[3..5], 16).unwrap_or(255);
            let b = u8::from_str_radix(&raw_color[5..7], 16).unwrap_or(255);
            Some(Color::Rgb(r, g, b))
        } else {
            raw_color.parse::<u8>().ok().map(Color::Indexed).or_else(|| {
                debug!("Unknown color '{raw_color}'");
                None
            })
        };

        let mut modifier = Modifier::empty();
        for part in spec_parts.iter().skip(1) {
            if matches!(*part, "x" | "regular") {
                modifier = Modifier::empty()
            } else {
                modifier |= match *part {
                    "b" | "bold" => Modifier::BOLD,
                    "u" | "underlined" => Modifier::UNDERLINED,
                    "d" | "dim" => Modifier::DIM,
                    "i" | "italic" => Modifier::ITALIC,
                    "r" | "reverse" => Modifier::REVERSED,
                    m => {
                        debug!("Unknown modifier '{m}'");
                        Modifier::empty()
                    }
                };
            }
        }

        let (component_name, background) = match name.strip_suffix("_bg").or_else(|| name.strip_suffix("-bg")) {
            Some(component) => (component, true),
            None => (name, false),
        };

        let style = match component_name {
            "normal" => &mut self.normal,
            "matched" | "hl" => &mut self.matched,
            "current" | "fg+" => &mut self.current,
            "current_match" | "hl+" => &mut self.current_match,
            "query" => &mut self.query,
            "placeholder" => &mut self.placeholder,
            "prompt" => &mut self.prompt,
            "cursor" | "indicator" => &mut self.cursor,
            "selected" => &mut self.selected,
            "unselected" => &mut self.unselected,
            "header" => &mut self.header,
            "help" => &mut self.help,
            other => {
                debug!("Unknown color component '{other}'");
                return;
            }
        };
        if let Some(c) = new_color {
            *style = if background { style.bg(c) } else { style.fg(c) };
        }
        *style = style.add_modifier(modifier);
    }

    /// Parses `BASE[,COMPONENT:COLOR[:MODIFIER]...]`
    fn from_options(color: &str) -> Self {
        let mut theme = ColorTheme::dark256();
        for pair in color.split(',') {
            if let Some((name, spec)) = pair.split_once(':') {
                theme.set_color(name, spec);
            } else {
                theme = match pair {
                    "light" => ColorTheme::light256(),
                    "16" => ColorTheme::default16(),
                    "bw" => ColorTheme::bw(),
                    "none" | "empty" => ColorTheme::none(),
                    "dark" | "default" => ColorTheme::dark256(),
                    t => {
                        debug!("Unknown color theme '{t}'");
                        ColorTheme::dark256()
                    }
                };
            }
        }
        theme
    }
}
