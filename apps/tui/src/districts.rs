use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::{self, ApiError, DataService};
use crate::domain::DistrictAggregate;
use crate::format;

/// One entry in the district selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictOption {
    pub value: Option<u32>,
    pub label: String,
}

enum LoadPhase {
    NotStarted,
    Loading(oneshot::Receiver<api::Result<Vec<DistrictAggregate>>>),
    Done(Vec<DistrictAggregate>),
}

/// Fetches the district aggregates once, independent of any filter.
pub struct DistrictLoader {
    phase: LoadPhase,
}

impl DistrictLoader {
    pub const fn new() -> Self {
        Self {
            phase: LoadPhase::NotStarted,
        }
    }

    /// Start the fetch on first use. Later calls do nothing.
    pub fn ensure_started(&mut self, service: &Arc<dyn DataService>) {
        if !matches!(self.phase, LoadPhase::NotStarted) {
            return;
        }

        let (tx, rx) = oneshot::channel();
        let service = Arc::clone(service);
        tokio::spawn(async move {
            let _ = tx.send(service.districts().await);
        });
        self.phase = LoadPhase::Loading(rx);
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Loading(_))
    }

    /// Collect the result if it has arrived.
    pub fn tick(&mut self) {
        let LoadPhase::Loading(receiver) = &mut self.phase else {
            return;
        };

        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => Err(abandoned()),
        };
        self.finish(result);
    }

    pub async fn wait(&mut self) {
        let LoadPhase::Loading(receiver) = &mut self.phase else {
            return;
        };

        let result = receiver.await.unwrap_or_else(|_| Err(abandoned()));
        self.finish(result);
    }

    pub fn districts(&self) -> &[DistrictAggregate] {
        match &self.phase {
            LoadPhase::Done(districts) => districts,
            LoadPhase::NotStarted | LoadPhase::Loading(_) => &[],
        }
    }

    /// "All districts" followed by one option per aggregate, in arrival order.
    pub fn options(&self) -> Vec<DistrictOption> {
        std::iter::once(DistrictOption {
            value: None,
            label: "All districts".to_string(),
        })
        .chain(self.districts().iter().map(|district| DistrictOption {
            value: Some(district.cd_number),
            label: format!(
                "{} — {}P / {}T",
                format::district(district.cd_number),
                district.priority_count,
                district.target_count
            ),
        }))
        .collect()
    }

    fn finish(&mut self, result: api::Result<Vec<DistrictAggregate>>) {
        let districts = match result {
            Ok(districts) => {
                tracing::info!(count = districts.len(), "Loaded district aggregates");
                districts
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to load district aggregates");
                Vec::new()
            }
        };
        self.phase = LoadPhase::Done(districts);
    }
}

impl Default for DistrictLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn abandoned() -> ApiError {
    ApiError::Network("district load abandoned".to_string())
}
