use thiserror::Error;

use crate::domain::FilterSnapshot;
use crate::filters::{self, FilterStore};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to open {url}: {source}")]
    Launch {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can hand a URL to the user's environment.
pub trait Launcher {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs in the system's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl Launcher for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        webbrowser::open(url)
    }
}

/// CSV download URL for a snapshot.
pub fn export_url(base_url: &str, snapshot: &FilterSnapshot) -> String {
    format!(
        "{}/api/export/csv?{}",
        base_url.trim_end_matches('/'),
        filters::encode(snapshot)
    )
}

/// Opens the CSV export for the applied filters.
pub struct ExportTrigger<L: Launcher = SystemBrowser> {
    base_url: String,
    launcher: L,
}

impl<L: Launcher> ExportTrigger<L> {
    pub fn new(base_url: &str, launcher: L) -> Self {
        Self {
            base_url: base_url.to_string(),
            launcher,
        }
    }

    /// Unapplied sidebar edits are never exported.
    pub fn trigger(&self, store: &FilterStore) -> Result<String, ExportError> {
        let url = export_url(&self.base_url, &store.applied());
        tracing::info!(%url, "Opening CSV export");

        if let Err(source) = self.launcher.open(&url) {
            tracing::error!(%url, error = %source, "Failed to open export");
            return Err(ExportError::Launch { url, source });
        }

        Ok(url)
    }
}
