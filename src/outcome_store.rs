//! Fill reports persisted as one JSON file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jobfill_core::RunGuard;
use jobfill_protocols::{FillReport, OutcomeStore, StoreError};
use tokio::sync::Mutex;
use tracing::debug;

/// Last report per page in `outcomes.json`, keyed like the run guard.
pub(crate) struct JsonOutcomeStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonOutcomeStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read(path: &Path) -> Result<BTreeMap<String, FillReport>, StoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, reports: &BTreeMap<String, FillReport>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(reports)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl OutcomeStore for JsonOutcomeStore {
    async fn save(&self, report: &FillReport) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut reports = Self::read(&self.path).await?;
        reports.insert(RunGuard::key(&report.url), report.clone());
        self.write(&reports).await?;
        debug!("Saved outcome for {} to {}", report.url, self.path.display());
        Ok(())
    }

    async fn last(&self, url: &str) -> Result<Option<FillReport>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(Self::read(&self.path).await?.remove(&RunGuard::key(url)))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jobfill_protocols::{FillOutcome, RunStatus};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn report(url: &str, filled: &str) -> FillReport {
        let mut outcome = FillOutcome::new();
        outcome.record_filled(filled);
        FillReport {
            id: Uuid::new_v4(),
            url: url.to_string(),
            site: None,
            status: RunStatus::Success,
            outcome,
            ai_submitted: 0,
            ai_filled: 0,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("outcomes.json");
        let store = JsonOutcomeStore::new(&path);
        store.save(&report("https://jobs.lever.co/acme/1", "Email")).await.unwrap();

        let reopened = JsonOutcomeStore::new(&path);
        let last = reopened.last("https://jobs.lever.co/acme/1#apply").await.unwrap().unwrap();
        assert!(last.outcome.is_filled("Email"));
    }

    #[tokio::test]
    async fn test_latest_report_wins() {
        let dir = TempDir::new().unwrap();
        let store = JsonOutcomeStore::new(dir.path().join("outcomes.json"));
        store.save(&report("https://jobs.lever.co/acme/1", "Email")).await.unwrap();
        store.save(&report("https://jobs.lever.co/acme/1", "Phone")).await.unwrap();
        store.save(&report("https://jobs.lever.co/acme/2", "City")).await.unwrap();

        let last = store.last("https://jobs.lever.co/acme/1").await.unwrap().unwrap();
        assert!(last.outcome.is_filled("Phone"));
        assert!(!last.outcome.is_filled("Email"));
    }

    #[tokio::test]
    async fn test_missing_file_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = JsonOutcomeStore::new(dir.path().join("outcomes.json"));
        assert!(store.last("https://jobs.lever.co/acme/1").await.unwrap().is_none());
        store.clear().await.unwrap();

        store.save(&report("https://jobs.lever.co/acme/1", "Email")).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.last("https://jobs.lever.co/acme/1").await.unwrap().is_none());
    }
}
