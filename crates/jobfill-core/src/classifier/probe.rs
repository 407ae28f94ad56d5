//! The open probe: reveal a lazily rendered option list, read it, close it.

use jobfill_config::TimingConfig;
use jobfill_protocols::{ElementHandle, Page, PageError};
use tracing::{debug, warn};

use crate::listbox::{close_widget as close, select_listbox};
use crate::wait::poll_until;

pub(super) async fn open_probe(
    page: &dyn Page,
    handle: &ElementHandle,
    timing: &TimingConfig,
) -> Result<Vec<String>, PageError> {
    let result = read_options(page, handle, timing).await;
    close(page, handle).await?;

    match result {
        Ok(options) => Ok(options),
        Err(e) if e.is_gone() => Err(e),
        Err(e) => {
            warn!("Probe of {} failed: {}", handle, e);
            Ok(Vec::new())
        }
    }
}

async fn read_options(
    page: &dyn Page,
    handle: &ElementHandle,
    timing: &TimingConfig,
) -> Result<Vec<String>, PageError> {
    page.focus(handle).await?;
    page.pointer_click(handle).await?;

    let found = poll_until(
        TimingConfig::ms(timing.probe_timeout),
        TimingConfig::ms(timing.probe_poll),
        move || async move {
            let probe = page.listbox_probe(handle).await?;
            Ok(select_listbox(&probe).map(|l| l.options.clone()))
        },
    )
    .await?;

    let Some(nodes) = found else {
        debug!("No option list appeared for {}", handle);
        return Ok(Vec::new());
    };

    let mut options: Vec<String> = Vec::new();
    for node in nodes {
        let text = node.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() && !options.contains(&text) {
            options.push(text);
        }
        if options.len() >= timing.probe_max_options {
            break;
        }
    }
    Ok(options)
}
