//! Label, visibility and answered-state derivation from raw snapshots.

use jobfill_protocols::{
    AnsweredState, ControlFamily, ControlState, FieldKind, LabelSources, NativeOption, Visibility,
};

use crate::text::clean_label;

/// Raw label by priority: accessible name, labelledby text, `<label for>`,
/// then the nearest container's label.
pub(crate) fn raw_label(sources: &LabelSources) -> Option<&str> {
    [
        &sources.aria_label,
        &sources.labelled_by,
        &sources.label_for,
        &sources.container_label,
    ]
    .into_iter()
    .filter_map(|s| s.as_deref())
    .find(|s| !clean_label(s).is_empty())
}

pub(crate) fn is_visible(visibility: &Visibility) -> bool {
    visibility.width > 0.0
        && visibility.height > 0.0
        && !visibility.display_none
        && !visibility.visibility_hidden
        && !visibility.disabled
        && !visibility.hidden_ancestor
}

const PROMPT_PREFIXES: [&str; 4] = ["select", "choose", "please", "--"];

/// Text that opens like a prompt ("Select...", "-- Choose --", "Please select").
/// Answers that mention choosing ("I choose not to disclose", "Choose not to
/// answer") are not prompts.
fn is_prompt_text(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return true;
    }
    PROMPT_PREFIXES.iter().any(|p| text.starts_with(p))
        && !text.split(|c: char| !c.is_alphanumeric()).any(|w| w == "not")
}

/// Prompt entries and empty-valued entries.
pub(crate) fn is_placeholder_option(option: &NativeOption) -> bool {
    option.value.trim().is_empty() || is_prompt_text(&option.text)
}

/// Real options of a native select, with their positions in the element.
pub(crate) fn native_choices(options: &[NativeOption]) -> Vec<(usize, &str)> {
    options
        .iter()
        .enumerate()
        .filter(|(_, o)| !is_placeholder_option(o))
        .map(|(i, o)| (i, o.text.trim()))
        .collect()
}

/// A rendered virtual value that is not itself a prompt.
pub(crate) fn is_real_value(text: &str) -> bool {
    !is_prompt_text(text)
}

pub(crate) fn answered_state(state: &ControlState) -> AnsweredState {
    let answered = match state {
        ControlState::Text { value } => !value.trim().is_empty(),
        ControlState::NativeChoice {
            selected_index,
            options,
            ..
        } => selected_index
            .and_then(|i| options.get(i))
            .is_some_and(|o| !is_placeholder_option(o)),
        ControlState::Virtual {
            single_value,
            chips,
            ..
        } => {
            single_value.as_deref().is_some_and(is_real_value)
                || chips.iter().any(|c| is_real_value(c))
        }
        ControlState::Toggle { members } => members.iter().any(|m| m.checked),
        ControlState::File { file_count, .. } => *file_count > 0,
    };
    if answered {
        AnsweredState::Answered
    } else {
        AnsweredState::Empty
    }
}

pub(crate) fn field_kind(family: ControlFamily, state: &ControlState) -> FieldKind {
    match (family, state) {
        (ControlFamily::FreeText, _) => FieldKind::FreeText,
        (ControlFamily::File, _) => FieldKind::File,
        (ControlFamily::VirtualChoice, ControlState::Virtual { multi: true, .. }) => FieldKind::MultiChoice,
        (ControlFamily::Toggle, ControlState::Toggle { members }) if members.len() == 1 => FieldKind::Binary,
        _ => FieldKind::SingleChoice,
    }
}

/// Options known without interacting with the control.
pub(crate) fn static_options(state: &ControlState) -> Vec<String> {
    match state {
        ControlState::NativeChoice { options, .. } => native_choices(options)
            .into_iter()
            .map(|(_, text)| text.to_string())
            .collect(),
        ControlState::Toggle { members } => members
            .iter()
            .map(|m| clean_label(&m.label))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobfill_protocols::{ElementHandle, ToggleMember};

    fn native(selected: Option<usize>) -> ControlState {
        ControlState::NativeChoice {
            selected_index: selected,
            selected_value: None,
            selected_text: None,
            options: vec![
                NativeOption {
                    text: "Select...".to_string(),
                    value: "".to_string(),
                },
                NativeOption {
                    text: "Yes".to_string(),
                    value: "1".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_label_priority() {
        let sources = LabelSources {
            aria_label: Some("  ".to_string()),
            labelled_by: None,
            label_for: Some("First Name*".to_string()),
            container_label: Some("Personal details".to_string()),
        };
        assert_eq!(raw_label(&sources), Some("First Name*"));
        assert_eq!(raw_label(&LabelSources::default()), None);
    }

    #[test]
    fn test_visibility() {
        let mut v = Visibility {
            width: 100.0,
            height: 20.0,
            ..Default::default()
        };
        assert!(is_visible(&v));
        v.disabled = true;
        assert!(!is_visible(&v));
        assert!(!is_visible(&Visibility::default()));
    }

    #[test]
    fn test_native_placeholder_not_answered() {
        assert_eq!(answered_state(&native(Some(0))), AnsweredState::Empty);
        assert_eq!(answered_state(&native(None)), AnsweredState::Empty);
        assert_eq!(answered_state(&native(Some(1))), AnsweredState::Answered);
        assert_eq!(static_options(&native(None)), vec!["Yes"]);
    }

    #[test]
    fn test_answer_mentioning_choose_is_not_placeholder() {
        let option = |text: &str, value: &str| NativeOption {
            text: text.to_string(),
            value: value.to_string(),
        };
        let state = ControlState::NativeChoice {
            selected_index: Some(2),
            selected_value: Some("2".to_string()),
            selected_text: Some("I choose not to disclose".to_string()),
            options: vec![
                option("-- Please choose --", ""),
                option("I am not a protected veteran", "1"),
                option("I choose not to disclose", "2"),
                option("Please select", "x"),
            ],
        };
        assert_eq!(answered_state(&state), AnsweredState::Answered);
        assert_eq!(
            static_options(&state),
            vec!["I am not a protected veteran", "I choose not to disclose"]
        );
        assert!(!is_placeholder_option(&option("Choose not to answer", "3")));
        assert!(is_real_value("Self-selected pronouns"));
        assert!(!is_real_value("Select an option"));
    }

    #[test]
    fn test_virtual_placeholder_value() {
        let state = ControlState::Virtual {
            single_value: Some("Select...".to_string()),
            chips: vec![],
            placeholder: None,
            multi: false,
            expanded: false,
        };
        assert_eq!(answered_state(&state), AnsweredState::Empty);
        let state = ControlState::Virtual {
            single_value: None,
            chips: vec!["Python".to_string()],
            placeholder: None,
            multi: true,
            expanded: false,
        };
        assert_eq!(answered_state(&state), AnsweredState::Answered);
        assert_eq!(field_kind(ControlFamily::VirtualChoice, &state), FieldKind::MultiChoice);
    }

    #[test]
    fn test_toggle_kinds() {
        let member = |label: &str, checked| ToggleMember {
            handle: ElementHandle::new(label),
            label: label.to_string(),
            checked,
        };
        let single = ControlState::Toggle {
            members: vec![member("I agree", false)],
        };
        assert_eq!(field_kind(ControlFamily::Toggle, &single), FieldKind::Binary);
        assert_eq!(answered_state(&single), AnsweredState::Empty);

        let group = ControlState::Toggle {
            members: vec![member("Yes", false), member("No", true)],
        };
        assert_eq!(field_kind(ControlFamily::Toggle, &group), FieldKind::SingleChoice);
        assert_eq!(answered_state(&group), AnsweredState::Answered);
    }
}
