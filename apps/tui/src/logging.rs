use color_eyre::eyre::eyre;
use color_eyre::Result;
use precinct_map_tui::config::AppConfig;
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. The interactive UI owns the terminal, so it
/// logs to a file; headless runs log to stderr and keep stdout for the report.
pub fn init(config: &AppConfig, headless: bool) -> Result<()> {
    let level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("precinct_map_tui={level},precinct_map={level}"))
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if headless {
        builder.with_writer(std::io::stderr).try_init()
    } else {
        let file = File::create(&config.log_path)?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    };

    installed.map_err(|e| eyre!("Failed to initialize logging: {e}"))?;

    tracing::info!(
        api_url = %config.api_url,
        map_token = %config.redacted_token(),
        "Starting precinct map"
    );
    Ok(())
}
