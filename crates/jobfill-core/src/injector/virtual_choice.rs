//! Lazily rendered choice widgets.
//!
//! Open with a pointer sequence, optionally type a query, wait for the list,
//! click the chosen option and confirm the widget now shows a value.

use jobfill_config::TimingConfig;
use jobfill_protocols::{
    ControlState, DomEvent, ElementHandle, Field, FieldError, Listbox, Page, PageError,
};
use tokio::time::sleep;
use tracing::debug;

use super::{Committed, Injector, Picker, SelectMode};
use crate::classifier::state::answered_state;
use crate::listbox::{close_widget, select_listbox, select_phone_listbox};
use crate::resolver::AnswerCandidate;
use crate::resolver::location::pick_location;
use crate::wait::poll_until;

pub(super) async fn commit(
    injector: &Injector,
    page: &dyn Page,
    field: &Field,
    candidates: &AnswerCandidate,
    mode: SelectMode,
    picker: &Picker,
) -> Result<Committed, FieldError> {
    let handle = &field.handle;
    let timing = &injector.timing;

    // A location widget is always queried with the city alone.
    let queries: Vec<Option<&str>> = match (mode, picker) {
        (SelectMode::Static, _) => vec![None],
        (SelectMode::Search { .. }, Picker::Location { .. }) => vec![candidates.first()],
        (SelectMode::Search { .. }, Picker::Standard | Picker::PhoneCountry) => {
            candidates.iter().map(Some).collect()
        }
    };

    let mut saw_list = false;
    for query in queries {
        page.focus(handle).await?;
        page.pointer_click(handle).await?;

        if let (Some(query), SelectMode::Search { network }) = (query, mode) {
            type_query(page, handle, query).await?;
            let settle = if network {
                timing.network_list_wait
            } else {
                timing.static_list_wait
            };
            sleep(TimingConfig::ms(settle)).await;
        }

        let Some(listbox) = wait_for_list(page, handle, picker, timing).await? else {
            close_widget(page, handle).await?;
            continue;
        };
        saw_list = true;

        let texts: Vec<String> = listbox.options.iter().map(|o| o.text.trim().to_string()).collect();
        let chosen = match picker {
            Picker::Standard | Picker::PhoneCountry => injector
                .resolver
                .best_match(&texts, candidates)
                .map(|m| m.option_index),
            Picker::Location { region } => candidates
                .first()
                .and_then(|city| pick_location(&texts, city, region.as_deref())),
        };
        let Some(index) = chosen else {
            debug!("No acceptable option for '{}' among {} rendered", field.label, texts.len());
            // A second click on an open widget would collapse it.
            close_widget(page, handle).await?;
            continue;
        };

        page.pointer_click(&listbox.options[index].handle).await?;
        sleep(TimingConfig::ms(timing.probe_poll)).await;
        return verify(page, handle, &texts[index]).await;
    }

    if saw_list {
        Err(FieldError::NoMatch)
    } else {
        Err(FieldError::WidgetTimeout(timing.probe_timeout))
    }
}

/// Clear, then type, each through the native setter with an input event.
async fn type_query(page: &dyn Page, handle: &ElementHandle, query: &str) -> Result<(), PageError> {
    page.set_native_value(handle, "").await?;
    page.dispatch(handle, DomEvent::Input).await?;
    page.set_native_value(handle, query).await?;
    page.dispatch(handle, DomEvent::Input).await
}

async fn wait_for_list(
    page: &dyn Page,
    handle: &ElementHandle,
    picker: &Picker,
    timing: &TimingConfig,
) -> Result<Option<Listbox>, PageError> {
    let phone = matches!(picker, Picker::PhoneCountry);
    poll_until(
        TimingConfig::ms(timing.probe_timeout),
        TimingConfig::ms(timing.probe_poll),
        move || async move {
            let probe = page.listbox_probe(handle).await?;
            let listbox = if phone {
                select_phone_listbox(&probe)
            } else {
                select_listbox(&probe)
            };
            Ok(listbox.cloned())
        },
    )
    .await
}

async fn verify(page: &dyn Page, handle: &ElementHandle, chosen: &str) -> Result<Committed, FieldError> {
    let live = page.control_state(handle).await?;
    if !answered_state(&live).is_answered() {
        close_widget(page, handle).await?;
        return Err(FieldError::NotCommitted(format!("widget did not show '{chosen}'")));
    }
    if matches!(live, ControlState::Virtual { expanded: true, .. }) {
        page.press_escape(handle).await?;
    }
    Ok(Committed {
        value: chosen.to_string(),
    })
}
