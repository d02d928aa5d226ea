//! riskglobe - Global weather risk dashboard
//!
//! A terminal UI application that displays hourly forecasts and derived risk
//! scores for locations around the globe, falling back to simulated data
//! whenever the live forecast API is unavailable.

use std::io;
use std::panic;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use tracing::info;

use riskglobe::app::App;
use riskglobe::cli::{Cli, OutputMode, StartupConfig};
use riskglobe::data::{DataSource, WeatherLocation};
use riskglobe::fetcher::{FetchHandle, FetchMessage};
use riskglobe::logging::{self, LogTarget};
use riskglobe::reconcile::LocationSet;
use riskglobe::service::WeatherService;
use riskglobe::ui;

/// Document printed by `--json`
#[derive(Serialize)]
struct JsonOutput<'a> {
    source: DataSource,
    locations: &'a [WeatherLocation],
}

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

/// Fetches everything once and prints it as JSON
async fn run_json(
    service: WeatherService,
    config: &StartupConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = service.fetch_all_locations().await;
    let mut source = response.source;
    let mut locations = LocationSet::from_locations(response.locations);

    for probe in &config.probes {
        let response = service
            .fetch_by_coordinates(probe.latitude, probe.longitude)
            .await;
        source = response.source;
        if let Some(location) = response.location {
            locations.upsert_probe(probe.latitude, probe.longitude, location);
        }
    }

    let output = JsonOutput {
        source,
        locations: locations.as_slice(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Runs the interactive dashboard until the user quits
async fn run_dashboard(
    service: WeatherService,
    config: StartupConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::with_probes(config.probes);
    let mut fetcher = FetchHandle::new(service);

    // Trigger initial data load; the loop keeps drawing while it is pending
    fetcher.load_locations();

    // Main event loop
    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.tick(Instant::now());

        while let Some(message) = fetcher.try_recv() {
            match message {
                FetchMessage::Locations(response) => app.apply_locations(response),
                FetchMessage::Probe { request, response } => app.apply_probe(request, response),
            }
        }

        while let Some(request) = app.take_pending_probe() {
            fetcher.probe(request);
        }

        // Check if we should quit
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
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let output = config.output;
    let interactive = output == OutputMode::Interactive;
    logging::init(&LogTarget::resolve(config.log_file.as_deref(), interactive))?;
    info!(version = env!("CARGO_PKG_VERSION"), "riskglobe starting");

    let service = WeatherService::new(config.service.clone());

    match output {
        OutputMode::Json => run_json(service, &config).await,
        OutputMode::Interactive => run_dashboard(service, config).await,
    }
}
