//! In-memory outcome store.

use async_trait::async_trait;
use dashmap::DashMap;
use jobfill_protocols::{FillReport, OutcomeStore, StoreError};

use crate::guard::RunGuard;

/// Last report per page, keyed like [`RunGuard`] so fragments share a slot.
#[derive(Debug, Default)]
pub struct MemoryOutcomeStore {
    reports: DashMap<String, FillReport>,
}

impl MemoryOutcomeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

#[async_trait]
impl OutcomeStore for MemoryOutcomeStore {
    async fn save(&self, report: &FillReport) -> Result<(), StoreError> {
        self.reports.insert(RunGuard::key(&report.url), report.clone());
        Ok(())
    }

    async fn last(&self, url: &str) -> Result<Option<FillReport>, StoreError> {
        Ok(self.reports.get(&RunGuard::key(url)).map(|r| r.value().clone()))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.reports.clear();
        Ok(())
    }
}
