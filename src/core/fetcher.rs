//! Rate fetching abstractions

use super::rates::{FetchError, RateTable};
use async_trait::async_trait;

#[async_trait]
pub trait RateFetcher: Send + Sync {
    /// Fetches the latest rate table. One attempt per call.
    async fn fetch(&self) -> Result<RateTable, FetchError>;
}
