use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "precinct-map", version, about = "Precinct outreach map")]
pub struct CliArgs {
    /// Print a filter report and exit. A failed precinct fetch is noted in
    /// the report and still exits with status 0
    #[arg(long)]
    pub headless: bool,

    /// Print the headless report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the data service base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the log file used by the interactive UI
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Initial filters as a query string, e.g. "youth_min=0.2&district=12"
    #[arg(long, value_name = "QUERY")]
    pub filters: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var("PRECINCT_API_URL", url);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("PRECINCT_LOG_FILE", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
