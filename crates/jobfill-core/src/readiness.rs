//! Page-readiness gate.

use jobfill_config::TimingConfig;
use jobfill_protocols::{Page, PageError};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::site::SiteKind;
use crate::wait::{Quiet, wait_for_quiet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// No form signal appeared within the polling budget.
    NotAForm,
    Ready,
    /// Ready on a host that re-renders after load; carries how the quiet wait ended.
    Hydrated(Quiet),
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        !matches!(self, Readiness::NotAForm)
    }
}

pub struct ReadinessGate {
    timing: TimingConfig,
}

impl ReadinessGate {
    pub fn new(timing: TimingConfig) -> Self {
        Self { timing }
    }

    pub async fn await_ready(&self, page: &dyn Page, site: Option<SiteKind>) -> Result<Readiness, PageError> {
        if !self.poll_form_signal(page).await? {
            info!("No application form detected");
            return Ok(Readiness::NotAForm);
        }
        if !site.is_some_and(|s| s.hydrates()) {
            return Ok(Readiness::Ready);
        }

        let quiet = wait_for_quiet(
            page,
            TimingConfig::ms(self.timing.hydration_timeout),
            TimingConfig::ms(self.timing.hydration_stable),
            TimingConfig::ms(self.timing.quiet_poll),
        )
        .await?;
        debug!("Hydration wait ended: {:?}", quiet);
        sleep(TimingConfig::ms(self.timing.hydration_buffer)).await;
        Ok(Readiness::Hydrated(quiet))
    }

    async fn poll_form_signal(&self, page: &dyn Page) -> Result<bool, PageError> {
        for attempt in 0..self.timing.readiness_tries {
            if attempt > 0 {
                sleep(TimingConfig::ms(self.timing.readiness_delay)).await;
            }
            if page.has_form_signal().await? {
                debug!("Form signal after {} attempts", attempt + 1);
                return Ok(true);
            }
        }
        Ok(false)
    }
}
