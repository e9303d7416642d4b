use color_eyre::Result;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc};
use tracing::{info, warn};
use whereabouts_tui::{
    api::GeocodingClient,
    app::App,
    config::Config,
    controller::LookupController,
    events::{EventHandler, EventSink},
    location::ConfiguredSource,
    logging, ui,
};

const LOG_DIR: &str = "logs";

#[tokio::main]
async fn main() -> Result<()> {
    // Instrumentation and safety
    let _log_guard = logging::initialize_logging(LOG_DIR);
    install_hooks(restore_terminal_after_panic)?;

    let config = Config::load();
    let geocoder = GeocodingClient::from_config(&config.geocoding)?;
    if !geocoder.is_configured() {
        warn!("No geocoding API key; place names will not resolve");
    }
    let controller = Arc::new(LookupController::new(
        ConfiguredSource::from_config(&config.location),
        geocoder,
    ));

    // Ready terminal and state
    let mut terminal = setup_terminal()?;
    let mut app = App::new();
    let mut events = EventHandler::new(config.ui.tick_rate_ms);

    // Main loop
    while !app.should_quit {
        terminal.draw(|f| ui::render(f, &app))?;

        if let Some(event) = events.next().await {
            app.handle_event(event);
        }

        if app.take_activation() {
            info!("Lookup #{} started", app.lookups_started);
            let controller = Arc::clone(&controller);
            let mut sink = EventSink::new(events.tx.clone());
            tokio::spawn(async move {
                match controller.on_activate(&mut sink).await {
                    Ok(lookup) => info!("Lookup finished at {:?}", lookup.coordinate),
                    Err(e) => warn!("Lookup ended with error: {}", e),
                }
                sink.finished();
            });
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen, crossterm::cursor::Hide)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show)?;
    Ok(())
}

/// Installs color-eyre, then chains `cleanup` in front of its panic hook.
///
/// color-eyre replaces whatever hook is set, so the cleanup hook has to be
/// installed after it.
fn install_hooks(cleanup: fn()) -> Result<()> {
    color_eyre::install()?;

    let report_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        cleanup();
        report_hook(panic_info);
    }));
    Ok(())
}

fn restore_terminal_after_panic() {
    crossterm::terminal::disable_raw_mode().ok();
    crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show).ok();
}
