use crate::display::{DisplayState, DisplaySurface};
use crate::events::Event;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Default)]
pub struct App {
    pub display: DisplayState,
    pub tick_count: usize,
    pub should_quit: bool,

    /// Set by a key press; main takes it and spawns a lookup cycle.
    pub activation_requested: bool,
    pub lookups_started: usize,
    pub lookups_running: usize,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Tick => self.on_tick(),
            Event::Input(key) => self.handle_key(key),
            Event::Display(update) => self.display.apply(update),
            Event::LookupFinished => self.lookups_running = self.lookups_running.saturating_sub(1),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('l') | KeyCode::Enter | KeyCode::Char(' ') => {
                self.activation_requested = true
            }
            _ => {}
        }
    }

    /// Consumes a pending activation, counting it as started.
    pub fn take_activation(&mut self) -> bool {
        if !std::mem::take(&mut self.activation_requested) {
            return false;
        }
        self.lookups_started += 1;
        self.lookups_running += 1;
        true
    }
}
