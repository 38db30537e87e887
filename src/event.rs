//! Unified event loop that merges crossterm terminal events, controller
//! events, and a fixed-rate tick into a single async stream.
//!
//! The TUI main loop awaits `EventHandler::next()` to process all three
//! sources without blocking the render path.

use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::api::types::ApiEvent;

/// Unified event type consumed by the TUI main loop.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed (only `Press` kind; release/repeat are ignored on
    /// platforms that emit them).
    Key(KeyEvent),
    /// Terminal gained (`true`) or lost (`false`) focus.
    Focus(bool),
    /// Terminal was resized.
    Resize,
    /// Animation / state tick.
    Tick,
    /// An event from the controller task.
    Api(ApiEvent),
}

/// Multiplexes crossterm events, a tick timer, and the controller event
/// channel into a single `Event` stream.
pub struct EventHandler {
    crossterm_stream: EventStream,
    tick_interval: tokio::time::Interval,
    api_rx: mpsc::UnboundedReceiver<ApiEvent>,
}

impl EventHandler {
    pub fn new(api_rx: mpsc::UnboundedReceiver<ApiEvent>) -> Self {
        let tick_ms = crate::config::get().general.tick_rate_ms;
        let mut tick_interval = tokio::time::interval(Duration::from_millis(tick_ms));
        // Don't try to "catch up" missed ticks, just keep going.
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        Self {
            crossterm_stream: EventStream::new(),
            tick_interval,
            api_rx,
        }
    }

    /// Await the next event from any source.
    pub async fn next(&mut self) -> Result<Event> {
        loop {
            tokio::select! {
                // ── Controller events (highest priority) ────────────────
                Some(api_event) = self.api_rx.recv() => {
                    return Ok(Event::Api(api_event));
                }

                // ── Terminal events ─────────────────────────────────────
                Some(ct_result) = self.crossterm_stream.next() => {
                    match ct_result? {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            return Ok(Event::Key(key));
                        }
                        CrosstermEvent::FocusGained => return Ok(Event::Focus(true)),
                        CrosstermEvent::FocusLost => return Ok(Event::Focus(false)),
                        CrosstermEvent::Resize(..) => return Ok(Event::Resize),
                        // Swallow key release/repeat and mouse input.
                        _ => continue,
                    }
                }

                // ── Tick timer ──────────────────────────────────────────
                _ = self.tick_interval.tick() => {
                    return Ok(Event::Tick);
                }
            }
        }
    }
}
