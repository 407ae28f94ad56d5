//! Run outcome records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedField {
    pub label: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uploaded {
    pub resume: bool,
    pub cover_letter: bool,
}

/// Append-only record of one run.
///
/// Labels appear at most once per list; the first recorded outcome for a
/// label wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillOutcome {
    pub filled: Vec<String>,
    pub skipped_already_answered: Vec<String>,
    pub failed: Vec<FailedField>,
    pub uploaded: Uploaded,
}

impl FillOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    fn contains(&self, label: &str) -> bool {
        self.filled.iter().any(|l| l == label)
            || self.skipped_already_answered.iter().any(|l| l == label)
            || self.failed.iter().any(|f| f.label == label)
    }

    pub fn record_filled(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.contains(&label) {
            self.filled.push(label);
        }
    }

    pub fn record_skipped(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.contains(&label) {
            self.skipped_already_answered.push(label);
        }
    }

    pub fn record_failed(&mut self, label: impl Into<String>, reason: impl Into<String>) {
        let label = label.into();
        if !self.contains(&label) {
            self.failed.push(FailedField {
                label,
                reason: reason.into(),
            });
        }
    }

    pub fn is_filled(&self, label: &str) -> bool {
        self.filled.iter().any(|l| l == label)
    }

    pub fn is_skipped(&self, label: &str) -> bool {
        self.skipped_already_answered.iter().any(|l| l == label)
    }

    pub fn failure(&self, label: &str) -> Option<&FailedField> {
        self.failed.iter().find(|f| f.label == label)
    }

    /// Fold a later run on the same page into this record.
    ///
    /// A label filled by the later run is no longer reported as failed.
    pub fn merge(&mut self, later: FillOutcome) {
        for label in later.filled {
            self.failed.retain(|f| f.label != label);
            self.skipped_already_answered.retain(|l| *l != label);
            self.record_filled(label);
        }
        for label in later.skipped_already_answered {
            self.record_skipped(label);
        }
        for failed in later.failed {
            self.record_failed(failed.label, failed.reason);
        }
        self.uploaded.resume |= later.uploaded.resume;
        self.uploaded.cover_letter |= later.uploaded.cover_letter;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    /// Completed, but at least one field failed.
    Partial,
    /// A page-wide failure aborted the remaining steps.
    Error { reason: String },
}

impl RunStatus {
    pub fn from_outcome(outcome: &FillOutcome, abort_reason: Option<String>) -> Self {
        match abort_reason {
            Some(reason) => RunStatus::Error { reason },
            None if !outcome.failed.is_empty() => RunStatus::Partial,
            None => RunStatus::Success,
        }
    }
}

/// Everything reported for one run on one URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillReport {
    pub id: Uuid,
    pub url: String,
    pub site: Option<String>,
    pub status: RunStatus,
    pub outcome: FillOutcome,
    /// Questions sent to the AI collaborator.
    pub ai_submitted: usize,
    /// Fields filled through the AI path.
    pub ai_filled: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl FillReport {
    /// Fold a retry run into this report.
    pub fn absorb(&mut self, retry: FillReport) {
        let abort = match &retry.status {
            RunStatus::Error { reason } => Some(reason.clone()),
            _ => None,
        };
        self.outcome.merge(retry.outcome);
        self.ai_submitted += retry.ai_submitted;
        self.ai_filled += retry.ai_filled;
        self.finished_at = retry.finished_at;
        self.status = RunStatus::from_outcome(&self.outcome, abort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels_recorded_once() {
        let mut outcome = FillOutcome::new();
        outcome.record_filled("Email");
        outcome.record_filled("Email");
        outcome.record_failed("Email", "later failure");
        assert_eq!(outcome.filled, vec!["Email".to_string()]);
        assert!(outcome.failed.is_empty());
    }

    #[test]
    fn test_status_from_outcome() {
        let mut outcome = FillOutcome::new();
        outcome.record_filled("First Name");
        assert_eq!(RunStatus::from_outcome(&outcome, None), RunStatus::Success);

        outcome.record_failed("Gender", "no match");
        assert_eq!(RunStatus::from_outcome(&outcome, None), RunStatus::Partial);

        let status = RunStatus::from_outcome(&outcome, Some("page gone".to_string()));
        assert!(matches!(status, RunStatus::Error { .. }));
    }

    #[test]
    fn test_merge_promotes_later_fill() {
        let mut first = FillOutcome::new();
        first.record_failed("First Name", "not committed");
        first.uploaded.resume = true;

        let mut retry = FillOutcome::new();
        retry.record_filled("First Name");
        retry.record_skipped("Email");

        first.merge(retry);
        assert!(first.is_filled("First Name"));
        assert!(first.failure("First Name").is_none());
        assert!(first.is_skipped("Email"));
        assert!(first.uploaded.resume);
    }

    #[test]
    fn test_status_serialize() {
        let json = serde_json::to_string(&RunStatus::Error {
            reason: "gone".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"error","reason":"gone"}"#);
    }
}
