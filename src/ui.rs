//! TUI rendering for Whereabouts
//!
//! Draws the display state: a title bar, the four location slots, the error
//! banner when it is visible, and a help line.

use crate::app::App;
use crate::display::Slot;
use ratatui::{prelude::*, widgets::*};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Renders one frame of the TUI based on current application state.
///
/// # Arguments
///
/// * `f` - The ratatui frame to draw into (from `terminal.draw()`).
/// * `app` - Current application state.
pub fn render(f: &mut Frame, app: &App) {
    let banner_height = if app.display.error_visible() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.size());

    render_title(f, app, chunks[0]);
    render_location_panel(f, app, chunks[1]);
    if let Some(message) = app.display.error.as_deref() {
        render_error_banner(f, message, chunks[2]);
    }
    render_help(f, app, chunks[4]);
}

fn render_title(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " Whereabouts ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if app.display.is_busy() {
        let frame = SPINNER[app.tick_count % SPINNER.len()];
        spans.push(Span::styled(frame, Style::default().fg(Color::Cyan)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Latitude/longitude on top, city/town below.
fn render_location_panel(f: &mut Frame, app: &App, area: Rect) {
    let d = &app.display;
    let rows = vec![
        slot_line("Latitude:  ", &d.latitude),
        slot_line("Longitude: ", &d.longitude),
        slot_line("City:      ", &d.city),
        slot_line("Town:      ", &d.town),
    ];

    let p = Paragraph::new(rows).block(
        Block::default()
            .title(" Current Location ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(p, area);
}

fn slot_line<'a>(label: &'a str, slot: &'a Slot) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(slot.text(), slot_style(slot)),
    ])
}

fn slot_style(slot: &Slot) -> Style {
    match slot {
        Slot::Idle => Style::default().fg(Color::DarkGray),
        Slot::Loading => Style::default().fg(Color::Cyan),
        Slot::Value(_) => Style::default().fg(Color::Yellow),
        Slot::NotRetrievable => Style::default().fg(Color::DarkGray),
        Slot::RetrievalFailed | Slot::ConfigError => Style::default().fg(Color::Red),
    }
}

fn render_error_banner(f: &mut Frame, message: &str, area: Rect) {
    let p = Paragraph::new(message)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(p, area);
}

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let help = Paragraph::new(format!(
        " l/Enter get location   q quit   lookups: {} ({} running)",
        app.lookups_started, app.lookups_running
    ))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, area);
}
