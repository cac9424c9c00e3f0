//! Terminal UI for Aqualan staff: check a city's next delivery and browse the route table.
//!
//! Set `AQUALAN_ROUTE_SHEET` to a CSV file or URL to load the live route sheet,
//! and `AQUALAN_TUI_LOG` to a file path to keep logs.

mod app;
mod input;
mod ui;

use std::{env, fs::File, io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use aqualan_core::{ReloadReport, RouteTableSource, SharedScheduler};
use aqualan_source_sheet::from_location;
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use crate::app::App;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    // The terminal belongs to the UI, so logs only go to a file.
    if let Some(path) = env::var_os("AQUALAN_TUI_LOG") {
        let file = File::create(path)?;
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .init();
    }

    let scheduler = Arc::new(SharedScheduler::builtin());
    let source = match env::var("AQUALAN_ROUTE_SHEET") {
        Ok(location) if !location.trim().is_empty() => {
            let client = Client::builder()
                .user_agent(concat!("aqualan/", env!("CARGO_PKG_VERSION")))
                .build()?;
            Some(from_location(&location, client))
        }
        _ => None,
    };

    let mut app = App::new(Arc::clone(&scheduler), source.clone());
    if let Some(source) = &source {
        info!(source = %source.describe(), "loading route sheet");
        let result = reload(&scheduler, source.as_ref()).await;
        app.apply_reload(result);
    }

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::Lookup => {
                    if app.city_input.trim().is_empty() {
                        app.error_message = Some("Type a city first, then press Enter".into());
                        continue;
                    }
                    app.error_message = None;
                    app.info_message = None;
                    app.run_lookup(Local::now().naive_local());
                }
                Action::Reload => {
                    let Some(source) = app.source.clone() else {
                        app.error_message =
                            Some("No route sheet configured (set AQUALAN_ROUTE_SHEET)".into());
                        continue;
                    };

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let result = reload(&app.scheduler, source.as_ref()).await;
                    app.apply_reload(result);
                }
            }
        }
    }

    Ok(())
}

async fn reload(
    scheduler: &SharedScheduler,
    source: &dyn RouteTableSource,
) -> Result<ReloadReport, String> {
    let rows = source.fetch_rows().await.map_err(|err| err.to_string())?;
    Ok(scheduler.apply_rows(&rows))
}
