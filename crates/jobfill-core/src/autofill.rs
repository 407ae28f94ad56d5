//! Session-level entry point: guards, readiness, the fill, the hydration retry,
//! persistence and status notifications for one page.

use std::sync::Arc;

use jobfill_config::TimingConfig;
use jobfill_protocols::{
    ControlFamily, Documents, FillReport, FillStatus, OutcomeStore, Page, PageError, Profile,
    RunError, RunStatus, ShellNotifier,
};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::guard::RunGuard;
use crate::orchestrator::Orchestrator;
use crate::readiness::Readiness;
use crate::site::{detect_site, is_candidate_page};
use crate::text::matches_any_keyword;

/// Required fields whose emptiness after hydration means the host discarded the fill.
const IDENTITY_KEYWORDS: [&str; 3] = ["first name", "last name", "email"];

fn status_of(report: &FillReport) -> FillStatus {
    match &report.status {
        RunStatus::Error { reason } => FillStatus::Error {
            reason: reason.clone(),
        },
        RunStatus::Success | RunStatus::Partial => FillStatus::Success {
            filled: report.outcome.filled.len(),
            resume: report.outcome.uploaded.resume,
            cover_letter: report.outcome.uploaded.cover_letter,
            ai_filled: report.ai_filled,
        },
    }
}

pub struct AutoFill {
    orchestrator: Orchestrator,
    guard: Arc<RunGuard>,
    store: Arc<dyn OutcomeStore>,
    notifier: Arc<dyn ShellNotifier>,
    timing: TimingConfig,
}

impl AutoFill {
    pub fn new(
        orchestrator: Orchestrator,
        guard: Arc<RunGuard>,
        store: Arc<dyn OutcomeStore>,
        notifier: Arc<dyn ShellNotifier>,
        timing: TimingConfig,
    ) -> Self {
        Self {
            orchestrator,
            guard,
            store,
            notifier,
            timing,
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn guard(&self) -> &RunGuard {
        &self.guard
    }

    /// Fill the page once per visit. `None` when nothing ran.
    pub async fn run_fill(&self, page: &dyn Page, profile: Option<&Profile>, documents: &Documents) -> Option<FillReport> {
        let Some(profile) = profile else {
            info!("No applicant profile; requesting configuration");
            self.notifier.open_configuration();
            return None;
        };
        let url = match page.url().await {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot read page URL: {}", e);
                return None;
            }
        };
        if self.guard.has_run(&url) {
            debug!("Already ran on {}", url);
            return None;
        }

        let site = detect_site(&url);
        match self.orchestrator.await_ready(page, site).await {
            Ok(Readiness::NotAForm) => return None,
            Ok(_) => {}
            Err(e) => {
                let reason = RunError::Readiness(e).to_string();
                warn!("{}", reason);
                self.notifier.status(&url, FillStatus::Error { reason });
                return None;
            }
        }
        if !self.guard.try_begin(&url) {
            return None;
        }

        info!("Filling {} ({})", url, site.map_or("unknown site", |s| s.name()));
        self.notifier.status(&url, FillStatus::Running);
        let mut report = self.orchestrator.fill(page, profile, documents).await;
        report.site = site.map(|s| s.name().to_string());

        let aborted = matches!(report.status, RunStatus::Error { .. });
        if site.is_some_and(|s| s.hydrates()) && !aborted {
            sleep(TimingConfig::ms(self.timing.retry_delay)).await;
            match self.identity_was_reset(page).await {
                Ok(true) if self.guard.try_begin_retry(&url) => {
                    info!("Identity fields emptied after hydration; retrying {}", url);
                    let retry = self.orchestrator.fill(page, profile, documents).await;
                    report.absorb(retry);
                }
                Ok(_) => {}
                Err(e) => debug!("Skipping retry check: {}", e),
            }
        }

        if let Err(e) = self.store.save(&report).await {
            warn!("Failed to persist outcome for {}: {}", url, e);
        }
        self.notifier.status(&url, status_of(&report));
        Some(report)
    }

    async fn identity_was_reset(&self, page: &dyn Page) -> Result<bool, PageError> {
        let fields = self.orchestrator.classifier().scan_static(page).await?;
        Ok(fields.iter().any(|f| {
            f.family == ControlFamily::FreeText
                && f.required
                && !f.answered.is_answered()
                && matches_any_keyword(&f.label, &IDENTITY_KEYWORDS)
        }))
    }

    /// Resolves with the new URL once the page no longer maps to `key`.
    async fn navigated_from(&self, page: &dyn Page, key: &str) -> String {
        loop {
            sleep(TimingConfig::ms(self.timing.url_poll)).await;
            match page.url().await {
                Ok(url) if RunGuard::key(&url) != key => return url,
                Ok(_) => {}
                Err(e) => debug!("URL poll during run failed: {}", e),
            }
        }
    }

    /// Poll the page URL and start a run whenever it lands on a new
    /// application page, until `cancel` fires or the page goes away.
    ///
    /// The URL is still polled while a run is in progress; leaving the page
    /// abandons that run and the new page is considered at once.
    pub async fn watch(
        &self,
        page: &dyn Page,
        profile: Option<&Profile>,
        documents: &Documents,
        cancel: CancellationToken,
    ) -> Result<(), PageError> {
        let mut current: Option<String> = None;
        loop {
            let url = page.url().await?;
            let key = RunGuard::key(&url);
            if current.as_deref() != Some(key.as_str()) {
                debug!("Page changed to {}", url);
                current = Some(key.clone());
                if is_candidate_page(&url) && !self.guard.is_dismissed(&url) {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            info!("Watch stopped");
                            return Ok(());
                        }
                        _ = self.run_fill(page, profile, documents) => {}
                        next = self.navigated_from(page, &key) => {
                            info!("Left {} for {} mid-run; abandoning the run", url, next);
                            if self.guard.has_run(&url) {
                                let reason = RunError::PageGone.to_string();
                                self.notifier.status(&url, FillStatus::Error { reason });
                            }
                            continue;
                        }
                    }
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Watch stopped");
                    return Ok(());
                }
                _ = sleep(TimingConfig::ms(self.timing.url_poll)) => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "autofill_tests.rs"]
mod tests;
