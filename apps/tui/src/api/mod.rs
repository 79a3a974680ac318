// Data service boundary
// The HTTP service is external; everything else talks to it through `DataService`

pub mod client;
pub mod error;

pub use client::HttpDataService;
pub use error::{ApiError, Result};

use crate::domain::{DistrictAggregate, PrecinctCollection};
use async_trait::async_trait;

#[async_trait]
pub trait DataService: Send + Sync {
    /// `GET /api/districts`
    async fn districts(&self) -> Result<Vec<DistrictAggregate>>;

    /// `GET /api/precincts?<query>` where `query` comes from `filters::encode`.
    async fn precincts(&self, query: &str) -> Result<PrecinctCollection>;
}
