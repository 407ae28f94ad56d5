//! `run` and `watch` subcommands.

use jobfill_core::{RunGuard, is_candidate_page};
use jobfill_protocols::Page;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::app::{App, page};

pub(crate) async fn run(app: &App, url: Option<String>, json: bool) -> anyhow::Result<()> {
    let profile = app.profile()?;
    let documents = app.documents()?;
    let browser = app.browser();
    let page = page(&browser, url.as_deref()).await?;

    let current = page.url().await?;
    if !is_candidate_page(&current) {
        info!("{} is not a recognised job board; filling anyway", current);
    }

    let autofill = app.autofill(profile.as_ref());
    let Some(report) = autofill.run_fill(&page, profile.as_ref(), &documents).await else {
        println!("Nothing filled on {}", RunGuard::key(&current));
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for failed in &report.outcome.failed {
            println!("  failed: {} ({})", failed.label, failed.reason);
        }
        for skipped in &report.outcome.skipped_already_answered {
            println!("  kept:   {}", skipped);
        }
    }
    Ok(())
}

pub(crate) async fn watch(app: &App, url: Option<String>) -> anyhow::Result<()> {
    let profile = app.profile()?;
    let documents = app.documents()?;
    let browser = app.browser();
    let page = page(&browser, url.as_deref()).await?;
    let autofill = app.autofill(profile.as_ref());

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    println!("Watching the tab; press Ctrl-C to stop.");
    let result = autofill.watch(&page, profile.as_ref(), &documents, cancel).await;
    browser.shutdown().await?;
    result?;
    Ok(())
}
