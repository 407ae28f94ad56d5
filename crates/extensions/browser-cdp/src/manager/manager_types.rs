//! Manager errors and the pure pieces of Chrome launching.

use std::path::{Path, PathBuf};

use jobfill_config::BrowserConfig;
use thiserror::Error;

use crate::cdp::CdpError;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("could not connect to Chrome: {0}")]
    ConnectionFailed(String),

    #[error("no http(s) tab is open")]
    NoPage,

    #[error("could not open page: {0}")]
    NavigationFailed(String),

    #[error("browser command failed: {0}")]
    ActionFailed(String),

    #[error("not connected to Chrome")]
    NotConnected,

    #[error("no Chrome or Chromium executable found")]
    ChromeNotFound,

    #[error("could not start Chrome: {0}")]
    LaunchFailed(String),
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg) | CdpError::ChromeNotAvailable(msg) => Self::ConnectionFailed(msg),
            CdpError::NavigationFailed(msg) => Self::NavigationFailed(msg),
            CdpError::SessionClosed => Self::NotConnected,
            other => Self::ActionFailed(other.to_string()),
        }
    }
}

/// Chrome user data directory, `~/.jobfill/browser-profile` unless configured.
pub fn profile_dir(config: &BrowserConfig) -> PathBuf {
    match &config.profile_dir {
        Some(dir) => dir.clone(),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".jobfill/browser-profile"),
    }
}

/// HTTP debugging endpoint for the configured port.
pub fn endpoint(config: &BrowserConfig) -> String {
    format!("http://localhost:{}", config.debug_port)
}

/// Well-known install locations, most preferred first.
pub(crate) fn chrome_candidates() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ]
    } else if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ]
    }
}

/// Command line for a debuggable Chrome on a persistent profile.
pub(crate) fn launch_args(config: &BrowserConfig, profile: &Path) -> Vec<String> {
    let mut args = vec![
        format!("--remote-debugging-port={}", config.debug_port),
        format!("--user-data-dir={}", profile.display()),
    ];
    args.extend(
        [
            "--no-first-run",
            "--no-default-browser-check",
            "--disable-background-networking",
            "--disable-sync",
            "--disable-translate",
        ]
        .map(String::from),
    );
    if config.headless {
        args.push("--headless=new".to_string());
    }
    args
}
