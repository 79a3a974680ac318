mod app;
mod cli;
mod event;
mod logging;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use precinct_map_tui::api::{DataService, HttpDataService};
use precinct_map_tui::config::AppConfig;
use precinct_map_tui::domain::FilterSnapshot;
use precinct_map_tui::filters;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = AppConfig::from_env();
    let headless = args.headless || args.json || !is_terminal();
    logging::init(&config, headless)?;

    let initial = args
        .filters
        .as_deref()
        .map_or_else(FilterSnapshot::default, filters::decode);

    let service: Arc<dyn DataService> = Arc::new(HttpDataService::new(&config.api_url)?);
    let mut app = App::new(config, initial, service);

    if headless {
        return event::run_headless(&mut app, args.json).await;
    }

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app).await;
    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
