//! Locating the option list a virtual widget opened.

use jobfill_protocols::{ElementHandle, Listbox, ListboxProbe, Page, PageError};
use tracing::debug;

/// Country-code pickers render "+44"-style options and must never be
/// mistaken for the widget being filled.
pub fn looks_like_phone_picker(listbox: &Listbox) -> bool {
    if listbox.in_phone_widget {
        return true;
    }
    listbox.options.first().is_some_and(|first| {
        let text = first.text.trim_end();
        let digits = text
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .count();
        digits > 0 && text[..text.len() - digits].ends_with('+')
    })
}

fn usable(listbox: &Listbox) -> bool {
    listbox.visible && !listbox.options.is_empty() && !looks_like_phone_picker(listbox)
}

/// Pick the widget's listbox: contained first, then the ARIA-referenced one,
/// then any other open list on the page.
pub fn select_listbox(probe: &ListboxProbe) -> Option<&Listbox> {
    probe
        .contained
        .as_ref()
        .filter(|l| usable(l))
        .or_else(|| probe.aria_controlled.as_ref().filter(|l| usable(l)))
        .or_else(|| probe.open_elsewhere.iter().find(|l| usable(l)))
}

/// Pick a phone widget's own country list, the one [`select_listbox`] skips.
pub fn select_phone_listbox(probe: &ListboxProbe) -> Option<&Listbox> {
    let phone = |l: &&Listbox| l.visible && !l.options.is_empty() && looks_like_phone_picker(l);
    probe
        .contained
        .as_ref()
        .filter(phone)
        .or_else(|| probe.aria_controlled.as_ref().filter(phone))
        .or_else(|| probe.open_elsewhere.iter().find(phone))
}

/// Dismiss an open widget with Escape and an outside click.
///
/// Only a gone page is reported; other failures are logged.
pub(crate) async fn close_widget(page: &dyn Page, handle: &ElementHandle) -> Result<(), PageError> {
    for step in [page.press_escape(handle).await, page.click_outside().await] {
        match step {
            Err(e) if e.is_gone() => return Err(e),
            Err(e) => debug!("Closing {} failed: {}", handle, e),
            Ok(()) => {}
        }
    }
    Ok(())
}
