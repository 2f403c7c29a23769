use std::io::Stderr;
use std::ops::{Deref, DerefMut};
use std::sync::Once;

use color_eyre::eyre::Result;
use crossterm::cursor;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, KeyEventKind};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use futures::{FutureExt as _, StreamExt as _};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Position;
use ratatui::prelude::Backend;
use ratatui::{TerminalOptions, Viewport};
use tokio::sync::mpsc::unbounded_channel;
use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use super::Event;

static PANIC_HOOK_SET: Once = Once::new();

/// Terminal handle: owns the ratatui terminal and pumps input events
pub struct Tui<B: Backend = CrosstermBackend<Stderr>> {
    /// The ratatui terminal instance
    pub terminal: ratatui::Terminal<B>,
    /// Background task reading terminal events
    pub task: Option<JoinHandle<()>>,
    /// Receiver for TUI events
    pub event_rx: UnboundedReceiver<Event>,
    /// Sender for TUI events
    pub event_tx: UnboundedSender<Event>,
    /// Token for cancelling the input task
    pub cancellation_token: CancellationToken,
    /// Whether the UI takes the whole screen
    pub is_fullscreen: bool,
}

impl Tui {
    /// Creates a TUI drawing on stderr
    ///
    /// `height` of 0 takes the whole screen, anything else draws inline below the
    /// shell prompt.
    pub fn new(height: u16) -> Result<Self> {
        Self::new_with_height(CrosstermBackend::new(std::io::stderr()), height)
    }
}

impl<B: Backend> Tui<B>
where
    B::Error: Send + Sync + 'static,
{
    /// Creates a new TUI with the specified backend and height, 0 meaning fullscreen
    pub fn new_with_height(backend: B, height: u16) -> Result<Self> {
        let (event_tx, event_rx) = unbounded_channel();
        let viewport = if height == 0 {
            Viewport::Fullscreen
        } else {
            Viewport::Inline(height)
        };

        set_panic_hook();
        Ok(Self {
            terminal: ratatui::Terminal::with_options(backend, TerminalOptions { viewport })?,
            task: None,
            event_rx,
            event_tx,
            cancellation_token: CancellationToken::default(),
            is_fullscreen: height == 0,
        })
    }

    /// Creates a fullscreen TUI over an arbitrary backend, without touching the real terminal
    pub fn new_for_test(backend: B) -> Result<Self> {
        let (event_tx, event_rx) = unbounded_channel();
        Ok(Self {
            terminal: ratatui::Terminal::new(backend)?,
            task: None,
            event_rx,
            event_tx,
            cancellation_token: CancellationToken::default(),
            is_fullscreen: true,
        })
    }

    /// Enters the TUI by enabling raw mode and starting event handling
    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stderr(), EnableBracketedPaste)?;
        if self.is_fullscreen {
            crossterm::execute!(std::io::stderr(), EnterAlternateScreen)?;
        }
        self.start();
        Ok(())
    }

    /// Exits the TUI by stopping event handling and disabling raw mode
    pub fn exit(&mut self) -> Result<()> {
        self.stop();
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.flush()?;
            if self.is_fullscreen {
                crossterm::execute!(std::io::stderr(), LeaveAlternateScreen)?;
            }
            crossterm::execute!(std::io::stderr(), DisableBracketedPaste, cursor::Show)?;
            crossterm::terminal::disable_raw_mode()?;
        }
        // Inline: wipe what we drew and leave the cursor where we started
        if !self.is_fullscreen {
            let area = self.get_frame().area();
            self.terminal.clear()?;
            self.set_cursor_position(Position { x: area.x, y: area.y })?;
        }
        Ok(())
    }

    /// Stops the TUI event loop
    /// Equivalent to self.cancel()
    pub fn stop(&self) {
        self.cancel();
    }

    /// Cancels the input task
    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    /// Starts the task forwarding terminal input to the event channel
    pub fn start(&mut self) {
        let event_tx_clone = self.event_tx.clone();
        let cancellation_token_clone = self.cancellation_token.clone();
        if self.task.is_some() {
            self.cancel();
        }
        self.task = Some(tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            loop {
                let crossterm_event = reader.next().fuse();
                tokio::select! {
                    _ = cancellation_token_clone.cancelled() => {
                        break;
                    }
                    maybe_event = crossterm_event => {
                      match maybe_event {
                        Some(Ok(crossterm::event::Event::Key(key))) => {
                          if key.kind == KeyEventKind::Press {
                            _ = event_tx_clone.send(Event::Key(key));
                          }
                        }
                        Some(Ok(crossterm::event::Event::Resize(width, height))) => {
                          _ = event_tx_clone.send(Event::Resize(width, height));
                        }
                        Some(Ok(crossterm::event::Event::Paste(text))) => {
                          _ = event_tx_clone.send(Event::Paste(text));
                        }
                        Some(Err(e)) => {
                          _ = event_tx_clone.send(Event::Error(e.to_string()));
                        }
                        None => break,
                        Some(Ok(_)) => {},
                      }
                    },
                }
            }
        }));
    }

    /// Gets the next event from the event queue
    pub async fn next(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }
}

impl<B: Backend> Deref for Tui<B> {
    type Target = ratatui::Terminal<B>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl<B: Backend> DerefMut for Tui<B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl<B: Backend> Drop for Tui<B> {
    fn drop(&mut self) {
        if let Some(t) = self.task.take() {
            t.abort();
        }
        self.cancellation_token.cancel();
        if crossterm::terminal::is_raw_mode_enabled().unwrap_or(false) {
            if self.is_fullscreen {
                let _ = crossterm::execute!(std::io::stderr(), LeaveAlternateScreen);
            }
            let _ = crossterm::execute!(std::io::stderr(), DisableBracketedPaste, cursor::Show);
            let _ = crossterm::terminal::disable_raw_mode();
        }
    }
}

fn set_panic_hook() {
    PANIC_HOOK_SET.call_once(|| {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            ratatui::restore(); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    });
}
