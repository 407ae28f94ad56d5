//! Wiring shared by every subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use jobfill_browser_cdp::{BrowserManager, CdpPage};
use jobfill_config::{ApplicantLoader, Config, ConfigLoader};
use jobfill_core::{AutoFill, Orchestrator, RunGuard};
use jobfill_protocols::{AnswerProvider, Documents, Profile};
use jobfill_provider_anthropic::AnthropicProvider;
use tracing::{info, warn};

use crate::notifier::CliNotifier;
use crate::outcome_store::JsonOutcomeStore;

pub(crate) fn default_config_path() -> PathBuf {
    ConfigLoader::home_dir().join("config.toml")
}

pub(crate) struct App {
    pub config: Config,
    pub config_path: PathBuf,
}

impl App {
    pub(crate) fn load(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let config_path = path
            .map(|p| ConfigLoader::expand_pathbuf(&p))
            .unwrap_or_else(default_config_path);
        let config = ConfigLoader::load_or_default(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?;
        Ok(Self { config, config_path })
    }

    pub(crate) fn profile(&self) -> anyhow::Result<Option<Profile>> {
        ApplicantLoader::profile_from(&self.config.applicant).context("loading applicant profile")
    }

    pub(crate) fn documents(&self) -> anyhow::Result<Documents> {
        ApplicantLoader::load_documents(&self.config.applicant).context("loading applicant documents")
    }

    pub(crate) fn orchestrator(&self, profile: Option<&Profile>) -> Orchestrator {
        let orchestrator = Orchestrator::new(&self.config.matching, self.config.timing.clone());
        if !self.config.ai.enabled {
            return orchestrator;
        }
        match AnthropicProvider::from_config(&self.config.ai) {
            Ok(provider) => {
                let provider = match profile {
                    Some(profile) => provider.with_applicant(profile),
                    None => provider,
                };
                info!("AI answers enabled ({})", provider.id());
                orchestrator.with_provider(Arc::new(provider))
            }
            Err(e) => {
                warn!("AI answers disabled: {}", e);
                orchestrator
            }
        }
    }

    pub(crate) fn autofill(&self, profile: Option<&Profile>) -> AutoFill {
        let outcomes = ConfigLoader::home_dir().join("outcomes.json");
        AutoFill::new(
            self.orchestrator(profile),
            Arc::new(RunGuard::new()),
            Arc::new(JsonOutcomeStore::new(outcomes)),
            Arc::new(CliNotifier),
            self.config.timing.clone(),
        )
    }

    pub(crate) fn browser(&self) -> BrowserManager {
        BrowserManager::new(self.config.browser.clone())
    }
}

/// Open `url` in a new tab, or attach to the tab the user is on.
pub(crate) async fn page(browser: &BrowserManager, url: Option<&str>) -> anyhow::Result<CdpPage> {
    let page = match url {
        Some(url) => browser.open_page(url).await?,
        None => browser.attach_current().await?,
    };
    Ok(page)
}
