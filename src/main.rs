//! pawpoll: a terminal client for the Cats vs Dogs voting backend.
//!
//! Architecture:
//! - **UI loop** (main): runs the ratatui render loop, processes key and focus events.
//! - **Controller** (tokio task): owns the HTTP client and the poll timer.
//! - Two `mpsc` channels bridge them: `ApiCommand` (UI→Controller), `ApiEvent` (Controller→UI).
//!
//! The UI loop never awaits the network. The controller never touches the terminal.

mod api;
mod app;
mod config;
mod event;
mod notify;
mod results;
mod theme;
mod tui;
mod ui;

use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api::client::HttpClient;
use api::types::ApiCommand;
use api::worker::Controller;
use app::{App, AppAction};
use event::Event;

#[tokio::main]
async fn main() -> Result<()> {
    // ── Error handling & logging ─────────────────────────────────────────
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr) // TUI owns stdout; logs go to stderr
        .init();

    config::init()?;
    let cfg = config::get();
    info!("pawpoll starting against {}", cfg.api.base_url);

    // ── Channel setup ───────────────────────────────────────────────────
    let (cmd_tx, cmd_rx) = mpsc::channel::<ApiCommand>(32);
    let (evt_tx, evt_rx) = mpsc::unbounded_channel();

    // ── Spawn controller ────────────────────────────────────────────────
    let client = HttpClient::new(&cfg.api).wrap_err("Failed to build HTTP client")?;
    let controller = Controller::new(
        Arc::new(client),
        evt_tx,
        cfg.polling.clone(),
        &cfg.notifications,
    );
    let controller_task = tokio::spawn(controller.run(cmd_rx));

    // ── Initialise terminal ─────────────────────────────────────────────
    let mut terminal = tui::init()?;

    // ── App state ───────────────────────────────────────────────────────
    let mut app = App::new();
    let mut events = event::EventHandler::new(evt_rx);

    // ── Main event loop ─────────────────────────────────────────────────
    while app.running {
        terminal.draw(|frame| ui::render(frame, &app))?;

        let action = match events.next().await? {
            Event::Key(key) => app.handle_key(key),
            Event::Focus(focused) => app.set_visible(focused),
            Event::Tick => {
                app.on_tick(Instant::now());
                AppAction::Consumed
            }
            Event::Api(api_event) => {
                app.handle_api_event(api_event, Instant::now());
                AppAction::Consumed
            }
            // ratatui handles resize automatically on next draw.
            Event::Resize => AppAction::Consumed,
        };

        match action {
            AppAction::Quit => app.running = false,
            AppAction::Api(cmd) => {
                // A dropped vote would leave its button locked, so wait for room.
                if cmd_tx.send(cmd).await.is_err() {
                    warn!("Controller task has stopped");
                    app.running = false;
                }
            }
            AppAction::Consumed => {}
        }
    }

    // ── Cleanup ─────────────────────────────────────────────────────────
    let _ = cmd_tx.send(ApiCommand::Shutdown).await;
    drop(cmd_tx);
    tui::restore()?;
    // An in-flight request may still be pending; don't hang on it.
    let _ = tokio::time::timeout(Duration::from_secs(1), controller_task).await;
    info!("pawpoll exiting");
    Ok(())
}
