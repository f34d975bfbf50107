use crate::filter::{all_tags, visible};
use crate::journal_entry::JournalEntry;
use crate::journal_store::JournalStore;
use crate::note_form::{FormField, FormOutcome, NoteForm};
use crate::persistence::KeyValueStore;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    Home,
    #[default]
    Journal,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Journal, Tab::Profile];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Journal => "Journal",
            Tab::Profile => "Profile",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A user gesture, already decoded from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    SwitchTab(Tab),
    NextTab,
    PreviousTab,
    ToggleTheme,
    OpenAddForm,
    EditSelected,
    DeleteSelected,
    SelectNext,
    SelectPrevious,
    ToggleExpand,
    FocusSearch,
    SearchInput(char),
    SearchBackspace,
    FinishSearch,
    ClearFilters,
    NextTagFilter,
    PreviousTagFilter,
    FormInput(char),
    FormBackspace,
    FormEnter,
    FormNextField,
    FormPreviousField,
    FormLeft,
    FormRight,
    SaveForm,
    CloseForm,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// UI-only state. Entries themselves live in the [`JournalStore`].
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub tab: Tab,
    pub dark_mode: bool,
    /// Open add/edit dialog; an edit form carries the one entry being edited.
    pub form: Option<NoteForm>,
    pub search: String,
    pub search_focused: bool,
    /// Empty means "All".
    pub selected_tag: String,
    pub selected: usize,
    pub expanded: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.form.as_ref().and_then(NoteForm::editing_id)
    }

    pub fn visible_entries<'a>(&self, entries: &'a [JournalEntry]) -> Vec<&'a JournalEntry> {
        visible(entries, &self.search, &self.selected_tag)
    }

    pub fn selected_entry<'a>(&self, entries: &'a [JournalEntry]) -> Option<&'a JournalEntry> {
        self.visible_entries(entries).get(self.selected).copied()
    }

    pub fn apply<S: KeyValueStore>(
        &mut self,
        intent: Intent,
        store: &mut JournalStore<S>,
        now: DateTime<Utc>,
    ) -> Flow {
        match intent {
            Intent::Quit => return Flow::Quit,
            Intent::SwitchTab(tab) => self.tab = tab,
            Intent::NextTab => self.tab = self.tab.next(),
            Intent::PreviousTab => self.tab = self.tab.previous(),
            Intent::ToggleTheme => {
                self.dark_mode = !self.dark_mode;
                debug!(dark = self.dark_mode, "theme toggled");
            }
            Intent::OpenAddForm => self.form = Some(NoteForm::for_new()),
            Intent::EditSelected => {
                if let Some(entry) = self.selected_entry(store.entries()) {
                    self.form = Some(NoteForm::for_edit(entry));
                }
            }
            Intent::DeleteSelected => {
                if let Some(id) = self.selected_entry(store.entries()).map(|e| e.id.clone()) {
                    store.remove(&id);
                    info!(%id, "note deleted");
                    if self.expanded.as_deref() == Some(id.as_str()) {
                        self.expanded = None;
                    }
                }
            }
            Intent::SelectNext => self.selected += 1,
            Intent::SelectPrevious => self.selected = self.selected.saturating_sub(1),
            Intent::ToggleExpand => {
                if let Some(id) = self.selected_entry(store.entries()).map(|e| e.id.clone()) {
                    self.expanded = if self.expanded.as_deref() == Some(id.as_str()) {
                        None
                    } else {
                        Some(id)
                    };
                }
            }
            Intent::FocusSearch => self.search_focused = true,
            Intent::SearchInput(c) => {
                self.search.push(c);
                self.selected = 0;
            }
            Intent::SearchBackspace => {
                self.search.pop();
                self.selected = 0;
            }
            Intent::FinishSearch => self.search_focused = false,
            Intent::ClearFilters => {
                self.search.clear();
                self.selected_tag.clear();
                self.search_focused = false;
                self.selected = 0;
            }
            Intent::NextTagFilter => self.cycle_tag_filter(store.entries(), true),
            Intent::PreviousTagFilter => self.cycle_tag_filter(store.entries(), false),
            Intent::SaveForm => self.save_form(store, now),
            Intent::CloseForm => self.form = None,
            Intent::FormInput(_)
            | Intent::FormBackspace
            | Intent::FormEnter
            | Intent::FormNextField
            | Intent::FormPreviousField
            | Intent::FormLeft
            | Intent::FormRight => {
                if let Some(form) = self.form.as_mut() {
                    edit_form(form, intent);
                }
            }
        }

        self.settle(store.entries());
        Flow::Continue
    }

    fn save_form<S: KeyValueStore>(&mut self, store: &mut JournalStore<S>, now: DateTime<Utc>) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let Some(outcome) = form.submit(now) else {
            debug!("save blocked, title or summary is empty");
            return;
        };

        match outcome {
            FormOutcome::Create(draft) => {
                let id = store.add(draft).id.clone();
                info!(%id, "note added");
                self.selected = 0;
            }
            FormOutcome::Update(entry) => {
                let id = entry.id.clone();
                if store.update(entry) {
                    info!(%id, "note updated");
                }
            }
        }
        self.form = None;
    }

    fn cycle_tag_filter(&mut self, entries: &[JournalEntry], forward: bool) {
        let mut options = vec![""];
        options.extend(all_tags(entries));
        let current = options
            .iter()
            .position(|t| *t == self.selected_tag)
            .unwrap_or(0);
        let len = options.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.selected_tag = options[next].to_string();
        self.selected = 0;
    }

    /// Keeps the tag filter and selection pointing at something that exists.
    fn settle(&mut self, entries: &[JournalEntry]) {
        if !self.selected_tag.is_empty() && !all_tags(entries).contains(&self.selected_tag.as_str())
        {
            self.selected_tag.clear();
        }
        let count = self.visible_entries(entries).len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }
}

fn edit_form(form: &mut NoteForm, intent: Intent) {
    match intent {
        Intent::FormInput(c) => {
            if let Some(text) = form.focused_text_mut() {
                text.push(c);
            } else if c == ' ' && form.focus == FormField::Tags {
                form.toggle_preset_under_cursor();
            }
        }
        Intent::FormBackspace => {
            if let Some(text) = form.focused_text_mut() {
                text.pop();
            }
        }
        Intent::FormEnter => match form.focus {
            FormField::Summary => form.summary.push('\n'),
            FormField::CustomTag => {
                form.add_custom_tag();
            }
            FormField::Tags => form.toggle_preset_under_cursor(),
            FormField::Title | FormField::Emoji => form.focus = form.focus.next(),
        },
        Intent::FormNextField => form.focus = form.focus.next(),
        Intent::FormPreviousField => form.focus = form.focus.previous(),
        Intent::FormLeft | Intent::FormRight => {
            let forward = intent == Intent::FormRight;
            match form.focus {
                FormField::Emoji => form.cycle_emoji(forward),
                FormField::Tags => form.move_preset_cursor(forward),
                _ => {}
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal_entry::NoteDraft;
    use crate::persistence::memory::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    fn store() -> JournalStore<MemoryStore> {
        let mut store = JournalStore::open(MemoryStore::default());
        store.add(NoteDraft::new("Learned loops", "2024-01-09", "Python basics").with_tags(["Python"]));
        store.add(NoteDraft::new("Built a site", "2024-01-10", "Used HTML").with_tags(["HTML"]));
        store
    }

    fn type_text(view: &mut ViewState, store: &mut JournalStore<MemoryStore>, text: &str) {
        for c in text.chars() {
            view.apply(Intent::FormInput(c), store, now());
        }
    }

    #[test]
    fn starts_on_journal_tab_in_light_mode() {
        let view = ViewState::new();
        assert_eq!(view.tab, Tab::Journal);
        assert!(!view.dark_mode);
        assert!(view.form.is_none());
    }

    #[test]
    fn tabs_cycle_and_theme_toggles() {
        let mut store = store();
        let mut view = ViewState::new();
        view.apply(Intent::NextTab, &mut store, now());
        assert_eq!(view.tab, Tab::Profile);
        view.apply(Intent::NextTab, &mut store, now());
        assert_eq!(view.tab, Tab::Home);
        view.apply(Intent::PreviousTab, &mut store, now());
        assert_eq!(view.tab, Tab::Profile);
        view.apply(Intent::SwitchTab(Tab::Journal), &mut store, now());
        assert_eq!(view.tab, Tab::Journal);

        view.apply(Intent::ToggleTheme, &mut store, now());
        assert!(view.dark_mode);
    }

    #[test]
    fn add_flow_creates_note_at_top() {
        let mut store = store();
        let mut view = ViewState::new();
        view.apply(Intent::OpenAddForm, &mut store, now());
        type_text(&mut view, &mut store, "Robot arm");
        view.apply(Intent::FormNextField, &mut store, now());
        type_text(&mut view, &mut store, "Servo angles");
        view.apply(Intent::FormNextField, &mut store, now());
        view.apply(Intent::FormRight, &mut store, now());
        view.apply(Intent::FormNextField, &mut store, now());
        for _ in 0..4 {
            view.apply(Intent::FormRight, &mut store, now());
        }
        view.apply(Intent::FormInput(' '), &mut store, now());

        view.apply(Intent::SaveForm, &mut store, now());
        assert!(view.form.is_none());
        let top = &store.entries()[0];
        assert_eq!(store.entries().len(), 3);
        assert_eq!(top.title, "Robot arm");
        assert_eq!(top.summary, "Servo angles");
        assert_eq!(top.emoji, "😕");
        assert_eq!(top.tags, vec!["Robotics"]);
        assert_eq!(top.date, "2024-01-10T12:00:00.000Z");
    }

    #[test]
    fn empty_form_cannot_be_saved() {
        let mut store = store();
        let mut view = ViewState::new();
        view.apply(Intent::OpenAddForm, &mut store, now());
        type_text(&mut view, &mut store, "Only a title");
        view.apply(Intent::SaveForm, &mut store, now());
        assert!(view.form.is_some());
        assert_eq!(store.entries().len(), 2);
    }

    #[test]
    fn edit_flow_updates_selected_note_in_place() {
        let mut store = store();
        let mut view = ViewState::new();
        view.apply(Intent::SelectNext, &mut store, now());
        let target = store.entries()[1].clone();

        view.apply(Intent::EditSelected, &mut store, now());
        assert_eq!(view.editing_id(), Some(target.id.as_str()));
        view.apply(Intent::FormInput('!'), &mut store, now());
        view.apply(Intent::SaveForm, &mut store, now());

        assert!(view.editing_id().is_none());
        let edited = &store.entries()[1];
        assert_eq!(edited.id, target.id);
        assert_eq!(edited.color, target.color);
        assert_eq!(edited.title, "Learned loops!");
        assert_eq!(edited.date, target.date);
    }

    #[test]
    fn delete_removes_selected_and_clamps_selection() {
        let mut store = store();
        let mut view = ViewState::new();
        view.apply(Intent::SelectNext, &mut store, now());
        view.apply(Intent::SelectNext, &mut store, now());
        assert_eq!(view.selected, 1);

        view.apply(Intent::DeleteSelected, &mut store, now());
        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.entries()[0].title, "Built a site");
        assert_eq!(view.selected, 0);
    }

    #[test]
    fn search_narrows_visible_entries() {
        let mut store = store();
        let mut view = ViewState::new();
        view.apply(Intent::FocusSearch, &mut store, now());
        for c in "PYTHON".chars() {
            view.apply(Intent::SearchInput(c), &mut store, now());
        }
        let shown = view.visible_entries(store.entries());
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Learned loops");

        view.apply(Intent::ClearFilters, &mut store, now());
        assert_eq!(view.visible_entries(store.entries()).len(), 2);
        assert!(!view.search_focused);
    }

    #[test]
    fn tag_filter_cycles_through_all_then_each_tag() {
        let mut store = store();
        let mut view = ViewState::new();
        view.apply(Intent::NextTagFilter, &mut store, now());
        assert_eq!(view.selected_tag, "HTML");
        view.apply(Intent::NextTagFilter, &mut store, now());
        assert_eq!(view.selected_tag, "Python");
        view.apply(Intent::NextTagFilter, &mut store, now());
        assert_eq!(view.selected_tag, "");
        view.apply(Intent::PreviousTagFilter, &mut store, now());
        assert_eq!(view.selected_tag, "Python");
    }

    #[test]
    fn tag_filter_resets_when_tag_disappears() {
        let mut store = store();
        let mut view = ViewState::new();
        view.apply(Intent::NextTagFilter, &mut store, now());
        assert_eq!(view.selected_tag, "HTML");
        view.apply(Intent::DeleteSelected, &mut store, now());
        assert_eq!(view.selected_tag, "");
        assert_eq!(view.visible_entries(store.entries()).len(), 1);
    }

    #[test]
    fn expand_toggles_for_selected_card() {
        let mut store = store();
        let mut view = ViewState::new();
        let id = store.entries()[0].id.clone();
        view.apply(Intent::ToggleExpand, &mut store, now());
        assert_eq!(view.expanded.as_deref(), Some(id.as_str()));
        view.apply(Intent::ToggleExpand, &mut store, now());
        assert_eq!(view.expanded, None);
    }

    #[test]
    fn closing_form_discards_changes() {
        let mut store = store();
        let mut view = ViewState::new();
        view.apply(Intent::EditSelected, &mut store, now());
        view.apply(Intent::FormBackspace, &mut store, now());
        view.apply(Intent::CloseForm, &mut store, now());
        assert!(view.form.is_none());
        assert_eq!(store.entries()[0].title, "Built a site");
    }

    #[test]
    fn enter_in_custom_tag_field_adds_tag() {
        let mut store = store();
        let mut view = ViewState::new();
        view.apply(Intent::OpenAddForm, &mut store, now());
        view.apply(Intent::FormPreviousField, &mut store, now());
        type_text(&mut view, &mut store, " Chess ");
        view.apply(Intent::FormEnter, &mut store, now());
        let form = view.form.as_ref().unwrap();
        assert_eq!(form.tags, vec!["Chess"]);
        assert!(form.custom_tag.is_empty());
    }

    #[test]
    fn quit_ends_the_loop() {
        let mut store = store();
        let mut view = ViewState::new();
        assert_eq!(view.apply(Intent::Quit, &mut store, now()), Flow::Quit);
        assert_eq!(
            view.apply(Intent::SelectNext, &mut store, now()),
            Flow::Continue
        );
    }
}
