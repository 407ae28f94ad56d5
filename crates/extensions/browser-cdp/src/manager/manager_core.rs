//! BrowserManager: find or start Chrome, connect, hand out pages.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use jobfill_config::BrowserConfig;
use tokio::process::{Child, Command};
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::manager_types::{chrome_candidates, launch_args};
use super::{BrowserError, endpoint, profile_dir};
use crate::cdp::CdpClient;
use crate::page::CdpPage;

const STARTUP_POLLS: u32 = 30;
const STARTUP_POLL: Duration = Duration::from_millis(200);

pub struct BrowserManager {
    config: BrowserConfig,
    client: RwLock<Option<Arc<CdpClient>>>,
    /// Set only when this manager started Chrome itself.
    launched: RwLock<Option<Child>>,
}

impl BrowserManager {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            launched: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn find_chrome() -> Option<PathBuf> {
        chrome_candidates().iter().map(PathBuf::from).find(|p| p.exists())
    }

    async fn is_listening(&self) -> bool {
        reqwest::get(format!("{}/json/version", endpoint(&self.config))).await.is_ok()
    }

    async fn spawn_chrome(&self) -> Result<Child, BrowserError> {
        let executable = Self::find_chrome().ok_or(BrowserError::ChromeNotFound)?;
        let profile = profile_dir(&self.config);
        if let Err(e) = std::fs::create_dir_all(&profile) {
            warn!("Cannot create {}: {}", profile.display(), e);
        }

        info!("Starting {} on profile {}", executable.display(), profile.display());
        let child = Command::new(&executable)
            .args(launch_args(&self.config, &profile))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;
        debug!("Chrome pid {:?}", child.id());
        Ok(child)
    }

    async fn wait_until_listening(&self) -> Result<(), BrowserError> {
        for _ in 0..STARTUP_POLLS {
            sleep(STARTUP_POLL).await;
            if self.is_listening().await {
                return Ok(());
            }
        }
        Err(BrowserError::LaunchFailed(format!(
            "nothing listening on port {} after startup",
            self.config.debug_port
        )))
    }

    /// Connect once, starting Chrome first when nothing answers on the debug port.
    pub async fn connect(&self) -> Result<(), BrowserError> {
        if self.client.read().await.is_some() {
            return Ok(());
        }
        if self.is_listening().await {
            debug!("Reusing Chrome on port {}", self.config.debug_port);
        } else {
            *self.launched.write().await = Some(self.spawn_chrome().await?);
            self.wait_until_listening().await?;
        }

        let url = endpoint(&self.config);
        let client = CdpClient::connect(&url).await?;
        *self.client.write().await = Some(Arc::new(client));
        info!("Connected to Chrome at {}", url);
        Ok(())
    }

    async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.connect().await?;
        self.client.read().await.clone().ok_or(BrowserError::NotConnected)
    }

    /// Open `url` in a fresh tab.
    pub async fn open_page(&self, url: &str) -> Result<CdpPage, BrowserError> {
        let session = self.client().await?.new_page(None).await?;
        session.navigate(url).await?;
        debug!("Tab {} shows {}", session.target_id(), url);
        Ok(CdpPage::new(session))
    }

    /// Attach to the first http(s) tab the user already has open.
    pub async fn attach_current(&self) -> Result<CdpPage, BrowserError> {
        let client = self.client().await?;
        let tabs = client.list_pages().await?;
        let Some(tab) = tabs.iter().find(|t| t.is_web_page()) else {
            return Err(BrowserError::NoPage);
        };
        debug!("Attaching to {} ({})", tab.url, tab.id);
        Ok(CdpPage::new(client.attach_page(&tab.id).await?))
    }

    /// Drop the connection; stop Chrome only if this manager started it.
    pub async fn shutdown(&self) -> Result<(), BrowserError> {
        self.client.write().await.take();
        if let Some(mut child) = self.launched.write().await.take() {
            info!("Stopping Chrome");
            let _ = child.kill().await;
        }
        Ok(())
    }
}
