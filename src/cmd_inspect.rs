//! `scan` and `check` subcommands.

use jobfill_browser_cdp::BrowserManager;
use jobfill_config::{ApplicantLoader, ConfigValidator};
use jobfill_core::classifier::is_question;
use jobfill_core::{Readiness, detect_site};
use jobfill_protocols::{Page, Question};

use crate::app::{App, page};

/// Print the page's unanswered questions as JSON.
pub(crate) async fn scan(app: &App, url: Option<String>) -> anyhow::Result<()> {
    let browser = app.browser();
    let page = page(&browser, url.as_deref()).await?;
    let orchestrator = app.orchestrator(None);

    let current = page.url().await?;
    if orchestrator.await_ready(&page, detect_site(&current)).await? == Readiness::NotAForm {
        println!("No application form on {}", current);
        return Ok(());
    }

    let fields = orchestrator.classifier().scan(&page).await?;
    let questions: Vec<Question> = fields.iter().filter(|f| is_question(f)).map(Question::from).collect();
    println!("{}", serde_json::to_string_pretty(&questions)?);
    Ok(())
}

/// Validate the config and report what a run would use.
pub(crate) fn check(app: &App) -> anyhow::Result<()> {
    println!("Config: {}", app.config_path.display());
    if !app.config_path.exists() {
        println!("  (not found; using defaults)");
    }

    let result = ConfigValidator::validate(&app.config)?;
    for warning in &result.warnings {
        println!("  warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("  error: {}: {}", error.path, error.message);
    }

    match ApplicantLoader::profile_from(&app.config.applicant) {
        Ok(Some(profile)) => {
            let name = [profile.identity.first_name, profile.identity.last_name]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            println!("Profile: loaded ({})", if name.is_empty() { "no name set" } else { name.as_str() });
        }
        Ok(None) => println!("Profile: not configured"),
        Err(e) => println!("Profile: {}", e),
    }
    match ApplicantLoader::load_documents(&app.config.applicant) {
        Ok(docs) => println!(
            "Documents: resume {}, cover letter {}",
            docs.resume.as_ref().map_or("none", |d| d.filename.as_str()),
            docs.cover_letter.as_ref().map_or("none", |d| d.filename.as_str()),
        ),
        Err(e) => println!("Documents: {}", e),
    }

    println!(
        "AI answers: {}",
        if app.config.ai.is_usable() { "enabled" } else { "disabled" }
    );
    match BrowserManager::find_chrome() {
        Some(path) => println!("Chrome: {}", path.display()),
        None => println!("Chrome: not found"),
    }

    if !result.is_valid() {
        anyhow::bail!("{} configuration error(s)", result.errors.len());
    }
    Ok(())
}
