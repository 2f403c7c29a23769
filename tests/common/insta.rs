use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::OptionExt;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use sift::{
    Filter, FilterOptions, Outcome,
    tui::{Event, Tui, event::Action},
};

/// A test harness driving a [`Filter<TestBackend>`].
///
/// Events go through the same channel and `App::handle_event` path as the real
/// event loop, but are drained synchronously so tests never wait on a terminal.
pub struct TestHarness {
    /// The Filter instance backed by a TestBackend
    pub filter: Filter<TestBackend>,
}

impl TestHarness {
    /// Process all pending events from the event queue, including the ones they queue.
    pub fn tick(&mut self) -> Result<()> {
        loop {
            let (app, tui) = self.filter.app_and_tui()?;
            let mut events = Vec::new();
            while let Ok(event) = tui.event_rx.try_recv() {
                events.push(event);
            }
            if events.is_empty() {
                break;
            }
            for event in events {
                app.handle_event(tui, &event)?;
            }
        }
        Ok(())
    }

    /// Queue an event. Call `tick()` to process it.
    pub fn send(&mut self, event: Event) -> Result<()> {
        self.filter
            .tui_mut()
            .ok_or_eyre("TUI not initialized")?
            .event_tx
            .send(event)?;
        Ok(())
    }

    /// Send a key event and process it immediately.
    pub fn key(&mut self, key: KeyEvent) -> Result<()> {
        self.send(Event::Key(key))?;
        self.tick()
    }

    /// Send a character key event.
    pub fn char(&mut self, c: char) -> Result<()> {
        self.key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    /// Type a string, sending each character as a key event.
    pub fn type_str(&mut self, s: &str) -> Result<()> {
        for c in s.chars() {
            self.char(c)?;
        }
        Ok(())
    }

    /// Send an action and process it immediately.
    pub fn action(&mut self, action: Action) -> Result<()> {
        self.send(Event::Action(action))?;
        self.tick()
    }

    /// Resize the terminal and process the resulting events.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.filter
            .tui_mut()
            .ok_or_eyre("TUI not initialized")?
            .backend_mut()
            .resize(width, height);
        self.send(Event::Resize(width, height))?;
        self.tick()
    }

    /// Every row of the screen, trailing blanks trimmed, trailing empty rows dropped.
    pub fn screen(&self) -> Vec<String> {
        let Some(tui) = self.filter.tui_ref() else {
            return Vec::new();
        };
        let buffer = tui.backend().buffer();
        let mut rows: Vec<String> = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        rows
    }

    /// Texts of the current matches, in match order
    pub fn matches(&self) -> Vec<String> {
        self.filter
            .app()
            .item_list
            .items()
            .iter()
            .map(|item| item.text.to_string())
            .collect()
    }

    /// The session outcome, once decided
    pub fn outcome(&self) -> Option<&Outcome> {
        self.filter.app().outcome.as_ref()
    }

    /// The exit code the command line tool would report, `None` while running
    pub fn app_exit_code(&self) -> Option<i32> {
        if !self.filter.app().should_quit {
            return None;
        }
        self.outcome().map(Outcome::exit_code)
    }
}

// ============================================================================
// Factory functions
// ============================================================================

/// Initialize a test harness with the given options, candidates and dimensions.
///
/// Uses [`Filter::init`] for the core initialization and
/// [`Filter::init_tui_with`] to inject a [`TestBackend`], then lays out and
/// draws the first frame like [`Filter::enter`] does.
pub fn enter_sized<I, S>(items: I, options: FilterOptions, width: u16, height: u16) -> Result<TestHarness>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let candidates = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    let tui = Tui::new_for_test(TestBackend::new(width, height))?;
    let mut filter = Filter::<TestBackend>::init(options, candidates);
    filter.init_tui_with(tui);

    let mut harness = TestHarness { filter };
    harness.send(Event::Resize(width, height))?;
    harness.tick()?;
    Ok(harness)
}

/// Initialize a test harness on a 40x10 terminal.
pub fn enter_items<I, S>(items: I, options: FilterOptions) -> Result<TestHarness>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    enter_sized(items, options, 40, 10)
}

/// Parse FilterOptions from CLI-style arguments.
pub fn parse_options(args: &[&str]) -> FilterOptions {
    let mut full_args = vec!["sift"];
    full_args.extend(args);
    FilterOptions::try_parse_from(full_args)
        .expect("Failed to parse options")
        .build()
}

// ============================================================================
// Macros
// ============================================================================

/// Macro for writing compact UI tests.
///
/// ```ignore
/// insta_test!(test_name, ["a", "b", "c"], &["--limit", "2"], {
///     @type "foo";        // Type string
///     @char 'f';          // Send single character
///     @action Down;       // Send action
///     @key Enter;         // Send special key
///     @ctrl 'a';          // Send ctrl+char
///     @screen ["> foo"];  // Assert the screen rows
///     @matches ["foo"];   // Assert the current matches
///     @exited 0;          // Assert the exit code
/// });
/// ```
#[macro_export]
macro_rules! insta_test {
    ($name:ident, [$($item:expr),* $(,)?], $options:expr, { $($content:tt)* }) => {
        #[test]
        fn $name() -> color_eyre::Result<()> {
            let options = $crate::common::insta::parse_options($options);
            let items: Vec<&str> = vec![$($item),*];
            #[allow(unused_mut)]
            let mut h = $crate::common::insta::enter_items(items, options)?;

            insta_test!(@expand h; $($content)*);

            Ok(())
        }
    };

    ($name:ident, $items:expr, $options:expr, { $($content:tt)* }) => {
        #[test]
        fn $name() -> color_eyre::Result<()> {
            let options = $crate::common::insta::parse_options($options);
            #[allow(unused_mut)]
            let mut h = $crate::common::insta::enter_items($items, options)?;

            insta_test!(@expand h; $($content)*);

            Ok(())
        }
    };

    // Token processing rules
    (@expand $h:ident; ) => {};

    // @screen - assert the rendered rows
    (@expand $h:ident; @screen [$($row:expr),* $(,)?] ; $($rest:tt)*) => {
        let expected: Vec<&str> = vec![$($row),*];
        assert_eq!($h.screen(), expected);
        insta_test!(@expand $h; $($rest)*);
    };

    // @matches - assert the current match texts
    (@expand $h:ident; @matches [$($item:expr),* $(,)?] ; $($rest:tt)*) => {
        let expected: Vec<&str> = vec![$($item),*];
        assert_eq!($h.matches(), expected);
        insta_test!(@expand $h; $($rest)*);
    };

    // @char - send single character
    (@expand $h:ident; @char $c:expr ; $($rest:tt)*) => {
        $h.char($c)?;
        insta_test!(@expand $h; $($rest)*);
    };

    // @type - type a string
    (@expand $h:ident; @type $text:expr ; $($rest:tt)*) => {
        $h.type_str($text)?;
        insta_test!(@expand $h; $($rest)*);
    };

    // @action - send an action (e.g. @action Down;)
    (@expand $h:ident; @action $action:ident ; $($rest:tt)*) => {
        $h.action(sift::tui::event::Action::$action)?;
        insta_test!(@expand $h; $($rest)*);
    };

    // @action with parenthesized args (e.g. @action AddChar('x');)
    (@expand $h:ident; @action $action:ident ($($args:tt)*) ; $($rest:tt)*) => {
        $h.action(sift::tui::event::Action::$action($($args)*))?;
        insta_test!(@expand $h; $($rest)*);
    };

    // @key - send a special key (Enter, Esc, Tab, ...)
    (@expand $h:ident; @key $key:ident ; $($rest:tt)*) => {
        $h.key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::$key,
            crossterm::event::KeyModifiers::NONE
        ))?;
        insta_test!(@expand $h; $($rest)*);
    };

    // @ctrl with char
    (@expand $h:ident; @ctrl $key:literal ; $($rest:tt)*) => {
        $h.key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char($key),
            crossterm::event::KeyModifiers::CONTROL
        ))?;
        insta_test!(@expand $h; $($rest)*);
    };

    // @alt with char
    (@expand $h:ident; @alt $key:literal ; $($rest:tt)*) => {
        $h.key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char($key),
            crossterm::event::KeyModifiers::ALT
        ))?;
        insta_test!(@expand $h; $($rest)*);
    };

    // @shift - send a key with Shift modifier
    (@expand $h:ident; @shift $key:ident ; $($rest:tt)*) => {
        $h.key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::$key,
            crossterm::event::KeyModifiers::SHIFT
        ))?;
        insta_test!(@expand $h; $($rest)*);
    };

    // @shift with char
    (@expand $h:ident; @shift $key:literal ; $($rest:tt)*) => {
        $h.key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char($key),
            crossterm::event::KeyModifiers::SHIFT
        ))?;
        insta_test!(@expand $h; $($rest)*);
    };

    // @resize - resize the terminal
    (@expand $h:ident; @resize $w:expr, $hh:expr ; $($rest:tt)*) => {
        $h.resize($w, $hh)?;
        insta_test!(@expand $h; $($rest)*);
    };

    // @dbg - debug print current screen
    (@expand $h:ident; @dbg; $($rest:tt)*) => {
        println!("DBG screen:\n{}", $h.screen().join("\n"));
        insta_test!(@expand $h; $($rest)*);
    };

    // @assert - run an assertion closure taking the harness
    // Usage: @assert(|h| h.filter.app().should_quit);
    (@expand $h:ident; @assert ( $assertion:expr ) ; $($rest:tt)*) => {
        assert!(($assertion)(&$h));
        insta_test!(@expand $h; $($rest)*);
    };

    // @exited - assert that the app would exit with a specific status code
    (@expand $h:ident; @exited $code:expr ; $($rest:tt)*) => {
        assert_eq!(
            $h.app_exit_code(),
            Some($code),
            "Expected app to exit with status code {}, but got {:?}",
            $code,
            $h.app_exit_code()
        );
        insta_test!(@expand $h; $($rest)*);
    };
}
