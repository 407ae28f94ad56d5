//! In-memory reactive page used by engine tests.
//!
//! Virtual widgets only expose their options once opened, commit a value when
//! an option is clicked, and close on escape, an outside click or a second
//! click on the control.

use async_trait::async_trait;
use jobfill_protocols::{
    ControlFamily, ControlSnapshot, ControlState, DocumentBlob, DomEvent, ElementHandle,
    LabelSources, Listbox, ListboxProbe, NativeOption, OptionNode, Page, PageError, ToggleMember,
    Visibility,
};
use parking_lot::Mutex;

mod doubles;

pub(crate) use doubles::{RecordingNotifier, ScriptedProvider};

#[derive(Debug, Clone)]
enum FakeKind {
    Text {
        value: String,
    },
    Native {
        options: Vec<NativeOption>,
        selected: Option<usize>,
    },
    Virtual {
        options: Vec<String>,
        search: bool,
        multi: bool,
        value: Option<String>,
        chips: Vec<String>,
        query: String,
        expanded: bool,
    },
    Toggle {
        members: Vec<(String, bool)>,
    },
    File {
        count: usize,
        context: Option<String>,
    },
}

#[derive(Debug, Clone)]
struct FakeControl {
    handle: String,
    label: Option<String>,
    aria_label: Option<String>,
    required: bool,
    visible: bool,
    /// Ignores writes: the page's runtime reverts them.
    sticky: bool,
    /// Opens without ever rendering a list.
    never_lists: bool,
    /// Renders its list outside the widget behind a phone picker.
    detached_list: bool,
    /// The country picker of a phone widget.
    phone_widget: bool,
    /// Writing to this control navigates away.
    kills_page: bool,
    rejects_files: bool,
    kind: FakeKind,
}

#[derive(Debug)]
struct FakeState {
    url: String,
    form_signal: bool,
    form_after: u32,
    epoch: u64,
    churn: bool,
    gone: bool,
    controls: Vec<FakeControl>,
    open: Option<String>,
    writes: Vec<String>,
}

pub(crate) struct FakePage {
    state: Mutex<FakeState>,
}

fn gone() -> PageError {
    PageError::Gone("page navigated away".to_string())
}

fn family_of(kind: &FakeKind) -> ControlFamily {
    match kind {
        FakeKind::Text { .. } => ControlFamily::FreeText,
        FakeKind::Native { .. } => ControlFamily::NativeChoice,
        FakeKind::Virtual { .. } => ControlFamily::VirtualChoice,
        FakeKind::Toggle { .. } => ControlFamily::Toggle,
        FakeKind::File { .. } => ControlFamily::File,
    }
}

impl FakeControl {
    fn state(&self) -> ControlState {
        match &self.kind {
            FakeKind::Text { value } => ControlState::Text {
                value: value.clone(),
            },
            FakeKind::Native { options, selected } => ControlState::NativeChoice {
                selected_index: *selected,
                selected_value: selected.and_then(|i| options.get(i)).map(|o| o.value.clone()),
                selected_text: selected.and_then(|i| options.get(i)).map(|o| o.text.clone()),
                options: options.clone(),
            },
            FakeKind::Virtual {
                multi,
                value,
                chips,
                expanded,
                ..
            } => ControlState::Virtual {
                single_value: value.clone(),
                chips: chips.clone(),
                placeholder: Some("Select...".to_string()),
                multi: *multi,
                expanded: *expanded,
            },
            FakeKind::Toggle { members } => ControlState::Toggle {
                members: members
                    .iter()
                    .enumerate()
                    .map(|(i, (label, checked))| ToggleMember {
                        handle: ElementHandle::new(format!("{}-m-{}", self.handle, i)),
                        label: label.clone(),
                        checked: *checked,
                    })
                    .collect(),
            },
            FakeKind::File { count, context } => ControlState::File {
                file_count: *count,
                context: context.clone(),
            },
        }
    }

    fn snapshot(&self) -> ControlSnapshot {
        let visibility = if self.visible {
            Visibility {
                width: 200.0,
                height: 24.0,
                ..Default::default()
            }
        } else {
            Visibility {
                display_none: true,
                ..Default::default()
            }
        };
        ControlSnapshot {
            handle: ElementHandle::new(&self.handle),
            family: family_of(&self.kind),
            visibility,
            labels: LabelSources {
                aria_label: self.aria_label.clone(),
                labelled_by: None,
                label_for: self.label.clone(),
                container_label: None,
            },
            required_attr: self.required,
            placeholder: None,
            state: self.state(),
        }
    }

    /// Options currently rendered by an open virtual widget.
    fn visible_options(&self) -> Vec<String> {
        match &self.kind {
            FakeKind::Virtual {
                options,
                search,
                query,
                ..
            } => {
                let query = query.trim().to_lowercase();
                options
                    .iter()
                    .filter(|o| !*search || query.is_empty() || o.to_lowercase().contains(&query))
                    .cloned()
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}

impl FakePage {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                url: "https://jobs.lever.co/acme/1234".to_string(),
                form_signal: true,
                form_after: 0,
                epoch: 0,
                churn: false,
                gone: false,
                controls: Vec::new(),
                open: None,
                writes: Vec::new(),
            }),
        }
    }

    fn push(self, label: &str, kind: FakeKind) -> Self {
        {
            let mut state = self.state.lock();
            let handle = format!("jf-{}", state.controls.len() + 1);
            state.controls.push(FakeControl {
                handle,
                label: Some(label.to_string()),
                aria_label: None,
                required: false,
                visible: true,
                sticky: false,
                never_lists: false,
                detached_list: false,
                phone_widget: false,
                kills_page: false,
                rejects_files: false,
                kind,
            });
        }
        self
    }

    fn edit_last(self, f: impl FnOnce(&mut FakeControl)) -> Self {
        if let Some(control) = self.state.lock().controls.last_mut() {
            f(control);
        }
        self
    }

    pub(crate) fn at(self, url: &str) -> Self {
        self.state.lock().url = url.to_string();
        self
    }

    pub(crate) fn with_text(self, label: &str) -> Self {
        self.push(label, FakeKind::Text {
            value: String::new(),
        })
    }

    /// A native select with a leading "Select..." placeholder.
    pub(crate) fn with_native(self, label: &str, options: &[&str]) -> Self {
        let mut all = vec![NativeOption {
            text: "Select...".to_string(),
            value: String::new(),
        }];
        all.extend(options.iter().enumerate().map(|(i, t)| NativeOption {
            text: t.to_string(),
            value: format!("{}", i + 1),
        }));
        self.push(label, FakeKind::Native {
            options: all,
            selected: Some(0),
        })
    }

    fn virtual_kind(options: &[&str], search: bool, multi: bool) -> FakeKind {
        FakeKind::Virtual {
            options: options.iter().map(|s| s.to_string()).collect(),
            search,
            multi,
            value: None,
            chips: Vec::new(),
            query: String::new(),
            expanded: false,
        }
    }

    pub(crate) fn with_virtual(self, label: &str, options: &[&str]) -> Self {
        self.push(label, Self::virtual_kind(options, false, false))
    }

    /// A type-to-search widget that filters by the typed query.
    pub(crate) fn with_search(self, label: &str, options: &[&str]) -> Self {
        self.push(label, Self::virtual_kind(options, true, false))
    }

    pub(crate) fn with_multi(self, label: &str, options: &[&str]) -> Self {
        self.push(label, Self::virtual_kind(options, false, true))
    }

    pub(crate) fn with_radio(self, label: &str, members: &[&str]) -> Self {
        self.push(label, FakeKind::Toggle {
            members: members.iter().map(|m| (m.to_string(), false)).collect(),
        })
    }

    pub(crate) fn with_file(self, label: &str, context: &str) -> Self {
        self.push(label, FakeKind::File {
            count: 0,
            context: Some(context.to_string()),
        })
    }

    pub(crate) fn required(self) -> Self {
        self.edit_last(|c| c.required = true)
    }

    pub(crate) fn hidden(self) -> Self {
        self.edit_last(|c| c.visible = false)
    }

    pub(crate) fn unlabelled(self) -> Self {
        self.edit_last(|c| c.label = None)
    }

    pub(crate) fn aria(self, label: &str) -> Self {
        self.edit_last(|c| c.aria_label = Some(label.to_string()))
    }

    pub(crate) fn sticky(self) -> Self {
        self.edit_last(|c| c.sticky = true)
    }

    pub(crate) fn never_lists(self) -> Self {
        self.edit_last(|c| c.never_lists = true)
    }

    pub(crate) fn detached_list(self) -> Self {
        self.edit_last(|c| c.detached_list = true)
    }

    pub(crate) fn phone_widget(self) -> Self {
        self.edit_last(|c| c.phone_widget = true)
    }

    pub(crate) fn kills_page(self) -> Self {
        self.edit_last(|c| c.kills_page = true)
    }

    pub(crate) fn rejects_files(self) -> Self {
        self.edit_last(|c| c.rejects_files = true)
    }

    /// Pre-answer the last control as a user would have.
    pub(crate) fn answered(self, value: &str) -> Self {
        let value = value.to_string();
        self.edit_last(move |c| answer(c, &value))
    }

    pub(crate) fn without_form(self) -> Self {
        self.state.lock().form_signal = false;
        self
    }

    /// Report no form signal for the first `polls` checks.
    pub(crate) fn form_after(self, polls: u32) -> Self {
        self.state.lock().form_after = polls;
        self
    }

    /// Every epoch read observes a new mutation.
    pub(crate) fn churning(self) -> Self {
        self.state.lock().churn = true;
        self
    }

    pub(crate) fn navigate_away(&self) {
        self.state.lock().gone = true;
    }

    pub(crate) fn navigate_to(&self, url: &str) {
        self.state.lock().url = url.to_string();
    }

    /// Answer a control after the fact, as the user or the page might.
    pub(crate) fn set_answer(&self, label: &str, value: &str) {
        let mut state = self.state.lock();
        if let Some(control) = state
            .controls
            .iter_mut()
            .find(|c| c.label.as_deref() == Some(label))
        {
            answer(control, value);
        }
    }

    /// Displayed value: text, selected option, chips or checked members.
    pub(crate) fn value_of(&self, label: &str) -> Option<String> {
        let state = self.state.lock();
        let control = state
            .controls
            .iter()
            .find(|c| c.label.as_deref() == Some(label) || c.aria_label.as_deref() == Some(label))?;
        match &control.kind {
            FakeKind::Text { value } => Some(value.clone()).filter(|v| !v.is_empty()),
            FakeKind::Native { options, selected } => selected
                .filter(|i| *i > 0)
                .and_then(|i| options.get(i))
                .map(|o| o.text.clone()),
            FakeKind::Virtual { value, chips, .. } => {
                if chips.is_empty() {
                    value.clone()
                } else {
                    Some(chips.join(", "))
                }
            }
            FakeKind::Toggle { members } => {
                let checked: Vec<&str> = members
                    .iter()
                    .filter(|(_, c)| *c)
                    .map(|(l, _)| l.as_str())
                    .collect();
                (!checked.is_empty()).then(|| checked.join(", "))
            }
            FakeKind::File { count, .. } => (*count > 0).then(|| count.to_string()),
        }
    }

    /// Mutating interactions in order, e.g. `set:jf-1=Ana`, `pick:jf-2=Female`.
    pub(crate) fn writes(&self) -> Vec<String> {
        self.state.lock().writes.clone()
    }

    /// Writes that committed a value, excluding opens, closes and queries.
    pub(crate) fn commits(&self) -> Vec<String> {
        self.writes()
            .into_iter()
            .filter(|w| {
                ["set:", "pick:", "select:", "check:", "attach:"]
                    .iter()
                    .any(|p| w.starts_with(p))
            })
            .filter(|w| !is_query_write(w))
            .collect()
    }

    pub(crate) fn is_open(&self) -> bool {
        self.state.lock().open.is_some()
    }
}

fn is_query_write(write: &str) -> bool {
    write.starts_with("set:") && write.contains("?query")
}

fn answer(control: &mut FakeControl, value: &str) {
    match &mut control.kind {
        FakeKind::Text { value: v } => *v = value.to_string(),
        FakeKind::Native { options, selected } => {
            *selected = options.iter().position(|o| o.text == value);
        }
        FakeKind::Virtual {
            multi, value: v, chips, ..
        } => {
            if *multi {
                chips.push(value.to_string());
            } else {
                *v = Some(value.to_string());
            }
        }
        FakeKind::Toggle { members } => {
            for (label, checked) in members.iter_mut() {
                *checked = label.as_str() == value;
            }
        }
        FakeKind::File { count, .. } => *count = value.parse().unwrap_or(1),
    }
}

impl FakeState {
    fn check(&self) -> Result<(), PageError> {
        if self.gone { Err(gone()) } else { Ok(()) }
    }

    fn index_of(&self, handle: &ElementHandle) -> Result<usize, PageError> {
        self.check()?;
        self.controls
            .iter()
            .position(|c| c.handle == handle.as_str())
            .ok_or_else(|| PageError::StaleHandle(handle.to_string()))
    }

    /// Resolve `jf-3-opt-1` / `jf-3-m-0` style child handles.
    fn child(&self, handle: &ElementHandle, marker: &str) -> Option<(usize, usize)> {
        let (parent, index) = handle.as_str().rsplit_once(marker)?;
        let index = index.parse().ok()?;
        let position = self.controls.iter().position(|c| c.handle == parent)?;
        Some((position, index))
    }

    fn kill_if_needed(&mut self, index: usize) -> Result<(), PageError> {
        if self.controls[index].kills_page {
            self.gone = true;
            return Err(gone());
        }
        Ok(())
    }

    fn close_open(&mut self) {
        if let Some(open) = self.open.take() {
            if let Some(control) = self.controls.iter_mut().find(|c| c.handle == open) {
                if let FakeKind::Virtual {
                    expanded, query, ..
                } = &mut control.kind
                {
                    *expanded = false;
                    query.clear();
                }
            }
            self.epoch += 1;
        }
    }

    fn listbox_for(&self, control: &FakeControl) -> Listbox {
        Listbox {
            handle: ElementHandle::new(format!("{}-list", control.handle)),
            options: control
                .visible_options()
                .into_iter()
                .enumerate()
                .map(|(i, text)| OptionNode {
                    handle: ElementHandle::new(format!("{}-opt-{}", control.handle, i)),
                    text,
                })
                .collect(),
            visible: true,
            in_phone_widget: control.phone_widget,
            notice: None,
        }
    }
}

fn phone_picker() -> Listbox {
    Listbox {
        handle: ElementHandle::new("phone-list"),
        options: vec![OptionNode {
            handle: ElementHandle::new("phone-opt-0"),
            text: "United States +1".to_string(),
        }],
        visible: true,
        in_phone_widget: false,
        notice: None,
    }
}

#[async_trait]
impl Page for FakePage {
    async fn url(&self) -> Result<String, PageError> {
        let state = self.state.lock();
        state.check()?;
        Ok(state.url.clone())
    }

    async fn has_form_signal(&self) -> Result<bool, PageError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.check()?;
        if state.form_after > 0 {
            state.form_after -= 1;
            return Ok(false);
        }
        Ok(state.form_signal)
    }

    async fn mutation_epoch(&self) -> Result<u64, PageError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.check()?;
        if state.churn {
            state.epoch += 1;
        }
        Ok(state.epoch)
    }

    async fn controls(&self) -> Result<Vec<ControlSnapshot>, PageError> {
        let state = self.state.lock();
        state.check()?;
        Ok(state.controls.iter().map(FakeControl::snapshot).collect())
    }

    async fn control_state(&self, handle: &ElementHandle) -> Result<ControlState, PageError> {
        let state = self.state.lock();
        let index = state.index_of(handle)?;
        Ok(state.controls[index].state())
    }

    async fn focus(&self, handle: &ElementHandle) -> Result<(), PageError> {
        let state = self.state.lock();
        state.check()?;
        if state.index_of(handle).is_err() && state.child(handle, "-m-").is_none() {
            return Err(PageError::StaleHandle(handle.to_string()));
        }
        Ok(())
    }

    async fn pointer_click(&self, handle: &ElementHandle) -> Result<(), PageError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.check()?;

        if let Some((index, option)) = state.child(handle, "-opt-") {
            let control = &state.controls[index];
            let Some(text) = control.visible_options().get(option).cloned() else {
                return Err(PageError::StaleHandle(handle.to_string()));
            };
            let sticky = control.sticky;
            let parent = control.handle.clone();
            state.writes.push(format!("pick:{parent}={text}"));
            if !sticky {
                if let FakeKind::Virtual {
                    multi, value, chips, ..
                } = &mut state.controls[index].kind
                {
                    if *multi {
                        if !chips.contains(&text) {
                            chips.push(text);
                        }
                    } else {
                        *value = Some(text);
                    }
                }
            }
            state.close_open();
            return Ok(());
        }

        let index = state.index_of(handle)?;
        // Clicking an open combobox collapses it.
        if state.open.as_deref() == Some(handle.as_str()) {
            state.close_open();
            return Ok(());
        }
        if let FakeKind::Virtual { expanded, .. } = &mut state.controls[index].kind {
            *expanded = true;
            state.open = Some(handle.to_string());
            state.epoch += 1;
            state.writes.push(format!("open:{handle}"));
        }
        Ok(())
    }

    async fn user_click(&self, handle: &ElementHandle) -> Result<(), PageError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.check()?;
        let Some((index, member)) = state.child(handle, "-m-") else {
            return Err(PageError::StaleHandle(handle.to_string()));
        };
        state.kill_if_needed(index)?;
        let sticky = state.controls[index].sticky;
        let parent = state.controls[index].handle.clone();
        if let FakeKind::Toggle { members } = &mut state.controls[index].kind {
            let Some(label) = members.get(member).map(|(l, _)| l.clone()) else {
                return Err(PageError::StaleHandle(handle.to_string()));
            };
            if !sticky {
                let single = members.len() == 1;
                for (i, (_, checked)) in members.iter_mut().enumerate() {
                    if i == member {
                        *checked = if single { !*checked } else { true };
                    } else {
                        *checked = false;
                    }
                }
            }
            state.writes.push(format!("check:{parent}={label}"));
            state.epoch += 1;
        }
        Ok(())
    }

    async fn set_native_value(&self, handle: &ElementHandle, value: &str) -> Result<(), PageError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let index = state.index_of(handle)?;
        state.kill_if_needed(index)?;
        let sticky = state.controls[index].sticky;
        match &mut state.controls[index].kind {
            FakeKind::Text { value: current } => {
                if !sticky {
                    *current = value.to_string();
                }
                state.writes.push(format!("set:{handle}={value}"));
            }
            FakeKind::Virtual { query, .. } => {
                *query = value.to_string();
                state.writes.push(format!("set:{handle}?query={value}"));
            }
            _ => return Err(PageError::Script("value setter not applicable".to_string())),
        }
        state.epoch += 1;
        Ok(())
    }

    async fn dispatch(&self, handle: &ElementHandle, _event: DomEvent) -> Result<(), PageError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.index_of(handle)?;
        state.epoch += 1;
        Ok(())
    }

    async fn select_native_option(&self, handle: &ElementHandle, index: usize) -> Result<(), PageError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let position = state.index_of(handle)?;
        state.kill_if_needed(position)?;
        let sticky = state.controls[position].sticky;
        let FakeKind::Native { options, selected } = &mut state.controls[position].kind else {
            return Err(PageError::Script("not a select".to_string()));
        };
        let Some(text) = options.get(index).map(|o| o.text.clone()) else {
            return Err(PageError::Script(format!("no option {index}")));
        };
        if !sticky {
            *selected = Some(index);
        }
        state.writes.push(format!("select:{handle}={text}"));
        state.epoch += 1;
        Ok(())
    }

    async fn press_escape(&self, handle: &ElementHandle) -> Result<(), PageError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.check()?;
        state.writes.push(format!("escape:{handle}"));
        state.close_open();
        Ok(())
    }

    async fn click_outside(&self) -> Result<(), PageError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.check()?;
        state.close_open();
        Ok(())
    }

    async fn listbox_probe(&self, handle: &ElementHandle) -> Result<ListboxProbe, PageError> {
        let state = self.state.lock();
        let index = state.index_of(handle)?;
        let control = &state.controls[index];
        if state.open.as_deref() != Some(handle.as_str()) || control.never_lists {
            return Ok(ListboxProbe::default());
        }
        let listbox = state.listbox_for(control);
        if control.detached_list {
            Ok(ListboxProbe {
                contained: None,
                aria_controlled: None,
                open_elsewhere: vec![phone_picker(), listbox],
            })
        } else {
            Ok(ListboxProbe {
                contained: Some(listbox),
                ..Default::default()
            })
        }
    }

    async fn attach_file(&self, handle: &ElementHandle, blob: &DocumentBlob) -> Result<bool, PageError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let index = state.index_of(handle)?;
        state.kill_if_needed(index)?;
        if state.controls[index].rejects_files {
            return Ok(false);
        }
        let FakeKind::File { count, .. } = &mut state.controls[index].kind else {
            return Err(PageError::Script("not a file input".to_string()));
        };
        *count += 1;
        state.writes.push(format!("attach:{handle}={}", blob.filename));
        state.epoch += 1;
        Ok(true)
    }
}
