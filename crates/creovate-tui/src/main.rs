use anyhow::{Context, Result};
use creovate_core::{ClientSettings, Config, CreovateClient};

mod app;
mod form;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    let log_path = logging::init()?;

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config file");
        Config::new()
    });
    let settings = ClientSettings::resolve(&config);
    let client = CreovateClient::from_settings(&settings)
        .with_context(|| format!("Failed to create client for {}", settings.base_url))?;

    tracing::info!(
        base_url = %settings.base_url,
        timeout_secs = settings.request_timeout.as_secs(),
        log = %log_path.display(),
        "starting creovate"
    );

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut app = App::new(client, settings.request_timeout);
    let mut events = EventHandler::new();

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    if let Err(e) = &result {
        tracing::warn!(error = %e, "exiting with error");
    }
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}
