//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Async results are collected through an "inbox" channel:
//! - Effect handlers send `UiEvent`s to `inbox_tx`
//! - The runtime drains `inbox_rx` each frame
//! - This avoids per-operation receivers

use std::io::Stdout;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event;
use newsbee_core::news::NewsClient;
use newsbee_core::store::CredentialStore;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::{AppState, Screen};
use crate::{render, terminal, update};

type UiEventSender = mpsc::UnboundedSender<UiEvent>;
type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Target frame rate while something is animating (60fps = ~16ms per frame).
pub const FRAME_DURATION: std::time::Duration = std::time::Duration::from_millis(16);

/// Poll duration when idle. Longer timeout reduces CPU usage when nothing
/// is happening.
pub const IDLE_POLL_DURATION: std::time::Duration = std::time::Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
/// Terminal state is restored on drop or panic.
pub struct TuiRuntime {
    /// Terminal instance.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state.
    pub state: AppState,
    /// Inbox sender - effect handlers send events here.
    inbox_tx: UiEventSender,
    /// Inbox receiver - the runtime drains this each frame.
    inbox_rx: UiEventReceiver,
    /// Credential store shared with submit handlers.
    store: Arc<CredentialStore>,
    /// News client shared with fetch handlers.
    news: Arc<NewsClient>,
    /// Last time a Tick event was emitted.
    last_tick: std::time::Instant,
    /// Last time a terminal event was received (for fast tick during
    /// interaction).
    last_terminal_event: std::time::Instant,
}

impl TuiRuntime {
    /// Creates a new TUI runtime and enters the alternate screen.
    ///
    /// # Errors
    /// Returns an error if raw mode or the alternate screen cannot be
    /// entered.
    pub fn new(store: Arc<CredentialStore>, news: Arc<NewsClient>) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let now = std::time::Instant::now();
        Ok(Self {
            terminal,
            state: AppState::new(),
            inbox_tx,
            inbox_rx,
            store,
            news,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs the main event loop until the state asks to quit.
    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true; // Start dirty to ensure initial render

        while !self.state.should_quit {
            let events = self.collect_events()?;

            for event in events {
                // Track terminal activity for fast tick mode
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = std::time::Instant::now();
                }

                // Only Tick triggers render - this caps frame rate at tick
                // cadence. Other events update state but batch renders to
                // the next Tick.
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }

                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects events from the inbox and the terminal, emitting a Tick on
    /// the active cadence.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Fast polling while a fetch or submit is in flight (spinner is
        // animating) or during recent keyboard activity, slow otherwise.
        let recent_terminal_activity = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let busy = match &self.state.screen {
            Screen::Auth(auth) => auth.submitting,
            Screen::Feed(feed) => feed.loading,
        };
        let tick_interval = if busy || recent_terminal_activity {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        // Drain inbox - all async results arrive here
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Poll terminal events:
        // - If we already have events to process, do a non-blocking poll
        // - Otherwise, block until the next tick is due
        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            std::time::Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            // Drain any remaining buffered events (non-blocking)
            while event::poll(std::time::Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = std::time::Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Executes a single effect, sending the result event to the inbox.
    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            // Store operations are local file I/O; run them inline and feed
            // the result back through the inbox so the reducer sees them on
            // the next frame like any other async result.
            UiEffect::SubmitSignup { username, password } => {
                let result = self.store.signup(&username, &password);
                let _ = self.inbox_tx.send(UiEvent::SignupCompleted { result });
            }
            UiEffect::SubmitLogin { username, password } => {
                let result = self.store.login(&username, &password);
                let _ = self
                    .inbox_tx
                    .send(UiEvent::LoginCompleted { username, result });
            }
            UiEffect::FetchHeadlines { category } => {
                let tx = self.inbox_tx.clone();
                let news = Arc::clone(&self.news);
                tokio::spawn(async move {
                    tracing::debug!(category = %category, "fetching headlines");
                    let result = news.fetch(category).await;
                    if let Err(error) = &result {
                        tracing::warn!(category = %category, %error, "headline fetch failed");
                    }
                    let _ = tx.send(UiEvent::HeadlinesLoaded { category, result });
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
