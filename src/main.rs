//! Seoul Walk Finder - Browse Seoul walking trails
//!
//! A terminal UI application that picks the first walking trail in the
//! Seoul open-data dataset matching a chosen difficulty and district.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use walkfinder::app::App;
use walkfinder::cli::{Cli, StartupConfig};
use walkfinder::data::TrailsClient;
use walkfinder::finder::{QueryResult, TrailFinder};
use walkfinder::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    ui::render_trail_view(frame, app);
    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Runs a single query and prints the result to stdout
///
/// # Returns
/// `ExitCode::FAILURE` if the query failed, `ExitCode::SUCCESS` otherwise
async fn run_once(mut finder: TrailFinder) -> ExitCode {
    finder.start();
    match finder.wait_for_result().await {
        QueryResult::Found(record) => {
            println!("{}", record.name);
            println!("난이도: {}", record.level);
            println!("소요시간: {}", record.duration);
            if let Some(distance) = &record.distance {
                println!("거리: {}", distance);
            }
            println!("경로: {}", record.route_description);
            ExitCode::SUCCESS
        }
        QueryResult::NotFound => {
            println!("No course found for the selected level and area.");
            ExitCode::SUCCESS
        }
        QueryResult::Failed(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
        QueryResult::Loading => ExitCode::FAILURE,
    }
}

/// Runs the interactive terminal view until the user quits
async fn run_tui(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initial query for the startup selection
    app.start();

    // Main event loop
    loop {
        app.tick();

        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // A missing .env file is fine; the key may come from the real environment
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return Ok(ExitCode::FAILURE);
        }
    };

    let target = logging::resolve_target(config.once, config.log_file.as_deref())?;
    let default_directive = if config.once { "warn" } else { "info" };
    logging::init(&target, default_directive)?;

    info!(
        level = %config.selection.level,
        district = config.selection.district(),
        once = config.once,
        "starting walkfinder"
    );

    let client = TrailsClient::with_base_url(config.base_url, config.api_key);
    let finder = TrailFinder::new(client, config.selection);

    if config.once {
        return Ok(run_once(finder).await);
    }

    run_tui(App::new(finder, config.districts)).await?;
    Ok(ExitCode::SUCCESS)
}
