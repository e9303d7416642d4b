//! Event types and the main event loop driver for Whereabouts.
//!
//! This module defines the [`Event`] enum (keyboard input, ticks, display
//! updates from lookup cycles) and the [`EventHandler`], which runs a
//! background task that polls crossterm for key events and emits periodic
//! [`Event::Tick`]s. Lookup tasks write to the display through an
//! [`EventSink`], so the display state is only ever mutated by the main loop.

use crate::display::{DisplaySurface, DisplayUpdate};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::error;

/// Events processed by the application event loop.
#[derive(Debug)]
pub enum Event {
    /// Periodic tick used for spinner animation.
    Tick,
    /// User key press from the terminal.
    Input(KeyEvent),
    /// A write from a running lookup cycle.
    Display(DisplayUpdate),
    /// A lookup cycle has finished, successfully or not.
    LookupFinished,
}

/// Multiplexes terminal input and ticks into a single event stream.
///
/// Holds an unbounded channel: the sender ([`tx`](EventHandler::tx)) can be
/// cloned and given to lookup tasks, while the receiver is consumed by
/// [`next`](EventHandler::next) in the main loop.
pub struct EventHandler {
    /// Sender for posting events from spawned tasks.
    pub tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Creates a new event handler and spawns the input/tick task.
    ///
    /// The spawned task polls crossterm with a timeout of `tick_rate_ms`;
    /// when a key is pressed it sends [`Event::Input`], and when the tick
    /// interval elapses it sends [`Event::Tick`]. If the terminal stops
    /// answering, the task logs the failure and exits.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::from_secs(0));
                match event::poll(timeout) {
                    Ok(true) => match event::read() {
                        // Windows reports releases too
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            event_tx.send(Event::Input(key)).ok();
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!("Terminal read failed: {}", e);
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(e) => {
                        error!("Terminal poll failed: {}", e);
                        break;
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    if event_tx.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { tx, rx }
    }

    /// Receives the next event from the channel.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// A [`DisplaySurface`] that forwards every write to the main loop.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<Event>,
}

impl EventSink {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }

    pub fn finished(&self) {
        self.tx.send(Event::LookupFinished).ok();
    }
}

impl DisplaySurface for EventSink {
    fn apply(&mut self, update: DisplayUpdate) {
        // Receiver gone means we are shutting down.
        self.tx.send(Event::Display(update)).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Slot;

    #[test]
    fn sink_forwards_updates_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = EventSink::new(tx);

        sink.set_city(Slot::Loading);
        sink.show_error("boom");
        sink.finished();

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event);
        }

        assert!(matches!(seen[0], Event::Display(DisplayUpdate::City(Slot::Loading))));
        assert!(matches!(seen[1], Event::Display(DisplayUpdate::Latitude(Slot::Idle))));
        assert!(matches!(seen[2], Event::Display(DisplayUpdate::Longitude(Slot::Idle))));
        assert!(matches!(seen[3], Event::Display(DisplayUpdate::ShowError(ref m)) if m == "boom"));
        assert!(matches!(seen[4], Event::LookupFinished));
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn sink_ignores_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut sink = EventSink::new(tx);
        sink.set_town(Slot::Idle);
        sink.finished();
    }
}
