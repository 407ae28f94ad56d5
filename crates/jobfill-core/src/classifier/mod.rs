//! Control classification: turning page snapshots into [`Field`]s.

mod probe;
pub(crate) mod state;

use std::collections::HashSet;

use jobfill_config::TimingConfig;
use jobfill_protocols::{
    ControlFamily, ControlSnapshot, ControlState, Field, FieldKind, Page, PageError,
};
use tracing::{debug, info};

use crate::text::{clean_label, normalize};

/// Scan order of the control families.
const FAMILY_ORDER: [ControlFamily; 5] = [
    ControlFamily::VirtualChoice,
    ControlFamily::FreeText,
    ControlFamily::NativeChoice,
    ControlFamily::Toggle,
    ControlFamily::File,
];

fn family_rank(family: ControlFamily) -> usize {
    FAMILY_ORDER
        .iter()
        .position(|f| *f == family)
        .unwrap_or(FAMILY_ORDER.len())
}

/// Enumerates visible, labelled controls of the five families.
pub struct Classifier {
    timing: TimingConfig,
}

impl Classifier {
    pub fn new(timing: TimingConfig) -> Self {
        Self { timing }
    }

    /// Full scan. Unanswered virtual widgets are briefly opened to capture
    /// their option lists, then closed again.
    pub async fn scan(&self, page: &dyn Page) -> Result<Vec<Field>, PageError> {
        let mut fields = self.scan_static(page).await?;
        for field in fields.iter_mut() {
            self.populate_options(page, field).await?;
        }
        Ok(fields)
    }

    /// Capture the option list of an unanswered virtual widget, if not yet known.
    pub async fn populate_options(&self, page: &dyn Page, field: &mut Field) -> Result<(), PageError> {
        if field.family != ControlFamily::VirtualChoice || field.answered.is_answered() || !field.options.is_empty() {
            return Ok(());
        }
        field.options = probe::open_probe(page, &field.handle, &self.timing).await?;
        debug!("Probed '{}': {} options", field.label, field.options.len());
        Ok(())
    }

    /// Scan without touching any control.
    pub async fn scan_static(&self, page: &dyn Page) -> Result<Vec<Field>, PageError> {
        let mut snapshots = page.controls().await?;
        snapshots.sort_by_key(|s| family_rank(s.family));

        let mut seen = HashSet::new();
        let mut fields = Vec::new();
        for snapshot in snapshots {
            let Some(field) = classify(snapshot) else {
                continue;
            };
            if seen.insert(normalize(&field.label)) {
                fields.push(field);
            } else {
                debug!("Duplicate label '{}' ignored", field.label);
            }
        }
        info!("Classified {} fields", fields.len());
        Ok(fields)
    }
}

/// Build a field from one snapshot; `None` for hidden or unlabelled controls.
fn classify(snapshot: ControlSnapshot) -> Option<Field> {
    if snapshot.family != ControlFamily::File && !state::is_visible(&snapshot.visibility) {
        return None;
    }
    let Some(raw) = state::raw_label(&snapshot.labels) else {
        debug!("No label for control {}", snapshot.handle);
        return None;
    };
    let label = clean_label(raw);
    let required = raw.contains('*') || snapshot.required_attr;

    let answered = state::answered_state(&snapshot.state);
    let kind = state::field_kind(snapshot.family, &snapshot.state);
    let options = state::static_options(&snapshot.state);
    let (placeholder, members, context) = match snapshot.state {
        ControlState::Virtual { placeholder, .. } => (placeholder.or(snapshot.placeholder), Vec::new(), None),
        ControlState::Toggle { members } => (None, members, None),
        ControlState::File { context, .. } => (None, Vec::new(), context),
        _ => (snapshot.placeholder, Vec::new(), None),
    };

    Some(Field {
        label,
        kind,
        required,
        options,
        placeholder: placeholder.filter(|p| !p.trim().is_empty()),
        handle: snapshot.handle,
        family: snapshot.family,
        answered,
        members,
        context,
    })
}

/// Whether a field should be offered as an open question.
pub fn is_question(field: &Field) -> bool {
    field.kind != FieldKind::File && !field.answered.is_answered()
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
