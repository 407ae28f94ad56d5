//! Persisted fill outcomes.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::outcome::FillReport;

/// Keeps the last report per URL for display and audit.
#[async_trait]
pub trait OutcomeStore: Send + Sync {
    async fn save(&self, report: &FillReport) -> Result<(), StoreError>;

    async fn last(&self, url: &str) -> Result<Option<FillReport>, StoreError>;

    /// Drop every stored report.
    async fn clear(&self) -> Result<(), StoreError>;
}
