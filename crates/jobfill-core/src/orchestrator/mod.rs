//! Fill orchestration: readiness, the category plan, AI augmentation and
//! attachments, producing one [`FillReport`] per run.

mod ai;
mod attachments;
pub mod plan;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use jobfill_config::{MatchingConfig, TimingConfig};
use jobfill_protocols::{
    AnswerProvider, ControlFamily, Documents, Field, FieldError, FillOutcome, FillReport, Page,
    PageError, Profile, RunError, RunStatus,
};
use parking_lot::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::injector::{Answer, Injector};
use crate::readiness::{Readiness, ReadinessGate};
use crate::resolver::Resolver;
use crate::site::SiteKind;
use crate::text::normalize;
use crate::wait::wait_for_quiet;

/// Run state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ReadinessWait,
    Filling,
    AiAugmentation,
    Settled,
}

/// Mutable bookkeeping for one run.
#[derive(Debug, Default)]
struct RunState {
    outcome: FillOutcome,
    /// Normalized labels that already had their one attempt.
    attempted: HashSet<String>,
    ai_submitted: usize,
    ai_filled: usize,
}

impl RunState {
    fn claim(&mut self, field: &Field) -> bool {
        self.attempted.insert(normalize(&field.label))
    }

    fn is_attempted(&self, field: &Field) -> bool {
        self.attempted.contains(&normalize(&field.label))
    }
}

fn classification_error(e: PageError) -> RunError {
    if e.is_gone() {
        RunError::PageGone
    } else {
        RunError::Classification(e)
    }
}

pub struct Orchestrator {
    classifier: Classifier,
    injector: Injector,
    resolver: Arc<Resolver>,
    gate: ReadinessGate,
    timing: TimingConfig,
    provider: Option<Arc<dyn AnswerProvider>>,
    phase: Mutex<Phase>,
}

impl Orchestrator {
    pub fn new(matching: &MatchingConfig, timing: TimingConfig) -> Self {
        let resolver = Arc::new(Resolver::new(matching));
        Self {
            classifier: Classifier::new(timing.clone()),
            injector: Injector::new(resolver.clone(), timing.clone()),
            resolver,
            gate: ReadinessGate::new(timing.clone()),
            timing,
            provider: None,
            phase: Mutex::new(Phase::Idle),
        }
    }

    /// Enable the AI augmentation phase.
    pub fn with_provider(mut self, provider: Arc<dyn AnswerProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock()
    }

    fn enter(&self, phase: Phase) {
        debug!("Phase {:?}", phase);
        *self.phase.lock() = phase;
    }

    /// Wait for the page to present a form and, on hydrating sites, to go quiet.
    pub async fn await_ready(&self, page: &dyn Page, site: Option<SiteKind>) -> Result<Readiness, PageError> {
        self.enter(Phase::ReadinessWait);
        let readiness = self.gate.await_ready(page, site).await;
        if !matches!(readiness, Ok(Readiness::Ready | Readiness::Hydrated(_))) {
            self.enter(Phase::Idle);
        }
        readiness
    }

    /// Fill every planned category, then report.
    ///
    /// Per-field failures are recorded and the run continues; a page-wide
    /// failure stops the remaining steps and yields an error status carrying
    /// the partial outcome.
    pub async fn fill(&self, page: &dyn Page, profile: &Profile, documents: &Documents) -> FillReport {
        let started_at = Utc::now();
        let url = page.url().await.unwrap_or_default();
        self.enter(Phase::Filling);

        let mut run = RunState::default();
        let abort = self.fill_steps(page, profile, documents, &mut run).await.err();

        self.enter(Phase::Settled);
        if abort.is_none() {
            if let Err(e) = wait_for_quiet(
                page,
                TimingConfig::ms(self.timing.settle_timeout),
                TimingConfig::ms(self.timing.settle_stable),
                TimingConfig::ms(self.timing.quiet_poll),
            )
            .await
            {
                debug!("Settle wait ended early: {}", e);
            }
        }

        let status = RunStatus::from_outcome(&run.outcome, abort.map(|e| e.to_string()));
        info!(
            "Run on {} settled: {} filled, {} skipped, {} failed",
            url,
            run.outcome.filled.len(),
            run.outcome.skipped_already_answered.len(),
            run.outcome.failed.len()
        );
        FillReport {
            id: Uuid::new_v4(),
            url,
            site: None,
            status,
            outcome: run.outcome,
            ai_submitted: run.ai_submitted,
            ai_filled: run.ai_filled,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn fill_steps(
        &self,
        page: &dyn Page,
        profile: &Profile,
        documents: &Documents,
        run: &mut RunState,
    ) -> Result<(), RunError> {
        let fields = self.classifier.scan(page).await.map_err(classification_error)?;

        let mut filled_targets: Vec<&'static str> = Vec::new();
        for target in plan::build_plan(profile) {
            let matching: Vec<&Field> = fields
                .iter()
                .filter(|f| f.family != ControlFamily::File)
                .filter(|f| !run.is_attempted(f) && target.matches(&f.label))
                .collect();
            let chosen = if target.every_match {
                matching
            } else {
                matching.into_iter().take(1).collect()
            };
            for field in chosen {
                debug!("Target {} -> '{}'", target.name, field.label);
                let answer = target.answer_for(&filled_targets);
                if self.apply(page, field, answer, run).await? {
                    filled_targets.push(target.name);
                }
            }
        }

        if let Some(provider) = &self.provider {
            self.enter(Phase::AiAugmentation);
            self.augment(page, provider.as_ref(), run).await?;
        }

        self.attach_documents(page, documents, run).await
    }

    /// One attempt at one field. Returns whether the field was filled.
    async fn apply(&self, page: &dyn Page, field: &Field, answer: &Answer, run: &mut RunState) -> Result<bool, RunError> {
        if !run.claim(field) {
            return Ok(false);
        }
        if field.answered.is_answered() {
            run.outcome.record_skipped(&field.label);
            return Ok(false);
        }

        // Known options let a hopeless answer fail without opening the widget.
        let known = !field.options.is_empty() && field.options.len() < self.timing.probe_max_options;
        if known && !answer.needs_live_options() {
            if let Err(e) = self.resolver.resolve(field, &answer.candidates()) {
                warn!("'{}': {}", field.label, e);
                run.outcome.record_failed(&field.label, e.to_string());
                return Ok(false);
            }
        }

        let result = self.injector.commit(page, field, answer).await;
        if field.family != ControlFamily::FreeText {
            sleep(TimingConfig::ms(self.timing.pacing)).await;
        }
        match result {
            Ok(committed) => {
                debug!("Filled '{}' with '{}'", field.label, committed.value);
                run.outcome.record_filled(&field.label);
                Ok(true)
            }
            Err(FieldError::AlreadyAnswered) => {
                run.outcome.record_skipped(&field.label);
                Ok(false)
            }
            Err(FieldError::PageGone) => {
                run.outcome.record_failed(&field.label, FieldError::PageGone.to_string());
                Err(RunError::PageGone)
            }
            Err(e) => {
                warn!("'{}' not filled: {}", field.label, e);
                run.outcome.record_failed(&field.label, e.to_string());
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
