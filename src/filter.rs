//! Module containing sift's entry point
use std::io::Stderr;
use std::sync::Arc;

use color_eyre::eyre::{self, OptionExt, Result, bail};
use ratatui::backend::CrosstermBackend;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task::block_in_place;

use crate::options::FilterOptions;
use crate::output::{FilterOutput, Outcome};
use crate::theme::ColorTheme;
use crate::tui::{App, Event, Tui};

/// Main entry point for running sift
pub struct Filter<Backend = CrosstermBackend<Stderr>>
where
    Backend: ratatui::backend::Backend,
    Backend::Error: Send + Sync + 'static,
{
    app: App,
    tui: Option<Tui<Backend>>,
}

impl Filter {
    /// Run sift over `candidates`
    ///
    /// Returns without drawing anything when `--exit-0` or `--select-1` decide
    /// the outcome up front.
    ///
    /// When called from inside a multi-threaded tokio runtime the UI runs on it,
    /// otherwise a current-thread runtime is created for the session.
    pub fn run_with(options: FilterOptions, candidates: Vec<String>) -> Result<FilterOutput> {
        trace!("running sift");
        let mut filter = Self::init(options, candidates);

        if let Some(outcome) = filter.early_outcome() {
            debug!("decided before entering: {outcome:?}");
            filter.app.outcome = Some(outcome);
        } else {
            filter.init_tui()?;
            let task = async {
                filter.enter()?;
                filter.run().await?;
                eyre::Ok(())
            };

            match Handle::try_current() {
                Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                    block_in_place(|| handle.block_on(task))?;
                }
                Ok(_) => bail!("sift cannot block a current-thread runtime, run it from a multi-threaded one"),
                Err(_) => {
                    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
                    rt.block_on(task)?;
                }
            }
        }
        let output = filter.output();
        debug!("output: {output:?}");

        Ok(output)
    }

    /// Initialize the TUI on stderr, but do not enter it yet
    pub fn init_tui(&mut self) -> Result<()> {
        let height = match self.app.options.height {
            0 => 0,
            list => list.saturating_add(self.app.chrome_height()),
        };
        self.tui = Some(Tui::new(height)?);
        Ok(())
    }
}

impl<Backend: ratatui::backend::Backend + 'static> Filter<Backend>
where
    Backend::Error: Send + Sync + 'static,
{
    /// Initialize sift, running the initial query, without touching the terminal
    pub fn init(options: FilterOptions, candidates: Vec<String>) -> Self {
        let theme = Arc::new(ColorTheme::init_from_options(&options));
        debug!("{} candidates, limit {}", candidates.len(), options.limit);
        Self {
            app: App::from_options(options, theme, candidates),
            tui: None,
        }
    }

    /// Initialize the TUI with a caller-provided instance.
    ///
    /// Use this instead of [`init_tui()`](Filter::init_tui) when you need a
    /// non-default backend (e.g. `TestBackend` for tests).
    pub fn init_tui_with(&mut self, tui: Tui<Backend>) {
        self.tui = Some(tui);
    }

    /// Outcome decided by `--exit-0` / `--select-1` before any frame is drawn
    pub fn early_outcome(&self) -> Option<Outcome> {
        let app = &self.app;
        match app.item_list.count() {
            0 if app.options.exit_0 => Some(Outcome::QuitEmpty),
            1 if app.options.select_1 => Some(Outcome::Submitted(
                app.item_list.items().iter().map(|item| item.text.to_string()).collect(),
            )),
            _ => None,
        }
    }

    /// Returns a shared reference to the application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Returns a mutable reference to the application state.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Returns a shared reference to the TUI, if initialized
    pub fn tui_ref(&self) -> Option<&Tui<Backend>> {
        self.tui.as_ref()
    }

    /// Returns a mutable reference to the TUI, if initialized
    pub fn tui_mut(&mut self) -> Option<&mut Tui<Backend>> {
        self.tui.as_mut()
    }

    /// Returns mutable references to both the app and the TUI simultaneously.
    ///
    /// This is needed to call `app.handle_event(tui, ...)`, which borrows both.
    pub fn app_and_tui(&mut self) -> Result<(&mut App, &mut Tui<Backend>)> {
        let tui = self
            .tui
            .as_mut()
            .ok_or_eyre("TUI needs to be initialized before access")?;
        Ok((&mut self.app, tui))
    }

    /// Returns a clone of the TUI event sender.
    ///
    /// Use this to send events (e.g. [`Event::Action`]) to the running session
    /// from outside the event loop.
    pub fn event_sender(&self) -> Result<tokio::sync::mpsc::UnboundedSender<Event>> {
        Ok(self
            .tui
            .as_ref()
            .ok_or_eyre("TUI needs to be initialized using Filter::init_tui before getting the event sender")?
            .event_tx
            .clone())
    }

    /// Enter the TUI and queue the first layout and frame
    pub fn enter(&mut self) -> Result<()> {
        debug!("Entering TUI");
        let tui = self
            .tui
            .as_mut()
            .ok_or_eyre("TUI needs to be initialized using Filter::init_tui before entering")?;
        tui.enter()?;
        let size = tui.size()?;
        tui.event_tx.send(Event::Resize(size.width, size.height))?;
        Ok(())
    }

    /// Returns true once the session is decided
    pub fn should_quit(&self) -> bool {
        self.app.should_quit
    }

    /// Process a single event loop iteration.
    ///
    /// Returns `Ok(true)` if sift should quit, `Ok(false)` to continue.
    pub async fn tick(&mut self) -> Result<bool> {
        let tui = self
            .tui
            .as_mut()
            .ok_or_eyre("TUI should be initialized before the event loop can start")?;
        let evt = tui.next().await.ok_or_eyre("Could not acquire next event")?;
        trace!("event: {evt:?}");
        self.app.handle_event(tui, &evt)?;
        Ok(self.app.should_quit)
    }

    /// Run the event loop on the current task until the session is decided.
    pub async fn run(&mut self) -> Result<()> {
        trace!("Starting event loop");
        loop {
            if self.tick().await? {
                break Ok(());
            }
        }
    }

    /// Capture `self` and extract the output
    pub fn output(mut self) -> FilterOutput {
        if let Some(mut tui) = self.tui.take()
            && let Err(e) = tui.exit()
        {
            warn!("failed to restore the terminal: {e}");
        }
        FilterOutput {
            // unset when the loop never finished
            outcome: self.app.outcome.take().unwrap_or(Outcome::Aborted),
            query: self.app.input.value.clone(),
        }
    }
}
