use crate::journal_entry::{push_unique_tag, JournalEntry, NoteDraft, EMOJI_OPTIONS, TAG_PRESETS};
use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Summary,
    Emoji,
    Tags,
    CustomTag,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::Title,
        FormField::Summary,
        FormField::Emoji,
        FormField::Tags,
        FormField::CustomTag,
    ];

    pub fn next(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Create(NoteDraft),
    Update(JournalEntry),
}

/// Add/edit dialog state.
#[derive(Debug, Clone)]
pub struct NoteForm {
    pub title: String,
    pub summary: String,
    /// Kept verbatim from the edited entry until the user picks another one.
    pub emoji: String,
    pub tags: Vec<String>,
    pub custom_tag: String,
    pub focus: FormField,
    /// Highlighted preset chip while the tag row has focus.
    pub preset_cursor: usize,
    editing: Option<JournalEntry>,
}

impl NoteForm {
    pub fn for_new() -> Self {
        NoteForm {
            title: String::new(),
            summary: String::new(),
            emoji: EMOJI_OPTIONS[0].to_string(),
            tags: Vec::new(),
            custom_tag: String::new(),
            focus: FormField::Title,
            preset_cursor: 0,
            editing: None,
        }
    }

    pub fn for_edit(entry: &JournalEntry) -> Self {
        NoteForm {
            title: entry.title.clone(),
            summary: entry.summary.clone(),
            emoji: entry.emoji.clone(),
            tags: entry.tags.clone(),
            editing: Some(entry.clone()),
            ..Self::for_new()
        }
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_ref().map(|e| e.id.as_str())
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn emoji(&self) -> &str {
        &self.emoji
    }

    /// Steps through the offered emoji. A foreign emoji steps to the first or last option.
    pub fn cycle_emoji(&mut self, forward: bool) {
        let len = EMOJI_OPTIONS.len();
        let next = match EMOJI_OPTIONS.iter().position(|e| *e == self.emoji) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        self.emoji = EMOJI_OPTIONS[next].to_string();
    }

    pub fn move_preset_cursor(&mut self, forward: bool) {
        let len = TAG_PRESETS.len();
        self.preset_cursor = if forward {
            (self.preset_cursor + 1) % len
        } else {
            (self.preset_cursor + len - 1) % len
        };
    }

    pub fn toggle_preset_under_cursor(&mut self) {
        let tag = TAG_PRESETS[self.preset_cursor % TAG_PRESETS.len()];
        self.toggle_tag(tag);
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(i) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(i);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    /// Adds the trimmed custom tag. The input is cleared only if the tag was new.
    pub fn add_custom_tag(&mut self) -> bool {
        let tag = self.custom_tag.trim();
        if tag.is_empty() {
            return false;
        }
        let tag = tag.to_string();
        let added = push_unique_tag(&mut self.tags, &tag);
        if added {
            self.custom_tag.clear();
        }
        added
    }

    /// Text buffer of the focused field, if it takes typing.
    pub fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Summary => Some(&mut self.summary),
            FormField::CustomTag => Some(&mut self.custom_tag),
            FormField::Emoji | FormField::Tags => None,
        }
    }

    pub fn can_save(&self) -> bool {
        !self.title.trim().is_empty() && !self.summary.trim().is_empty()
    }

    /// `None` when title or summary is blank. A new note is dated `now`; an edited note keeps
    /// its id, color and date.
    pub fn submit(&self, now: DateTime<Utc>) -> Option<FormOutcome> {
        if !self.can_save() {
            return None;
        }
        let title = self.title.trim().to_string();
        let summary = self.summary.trim().to_string();

        let outcome = match &self.editing {
            Some(existing) => FormOutcome::Update(JournalEntry {
                id: existing.id.clone(),
                title,
                date: existing.date.clone(),
                summary,
                emoji: self.emoji().to_string(),
                tags: self.tags.clone(),
                color: existing.color.clone(),
            }),
            None => FormOutcome::Create(
                NoteDraft::new(title, now.to_rfc3339_opts(SecondsFormat::Millis, true), summary)
                    .with_emoji(self.emoji())
                    .with_tags(self.tags.iter().cloned()),
            ),
        };
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
    }

    fn existing() -> JournalEntry {
        JournalEntry {
            id: "42".to_string(),
            title: "Old".to_string(),
            date: "2024-01-01T08:00:00.000Z".to_string(),
            summary: "Old summary".to_string(),
            emoji: "🚀".to_string(),
            tags: vec!["Art".to_string()],
            color: "bg-pink-100 border-pink-200".to_string(),
        }
    }

    #[test]
    fn blank_title_or_summary_blocks_save() {
        let mut form = NoteForm::for_new();
        form.title = "   ".to_string();
        form.summary = "something".to_string();
        assert!(!form.can_save());
        assert_eq!(form.submit(now()), None);

        form.title = "Loops".to_string();
        form.summary = "\n\t".to_string();
        assert_eq!(form.submit(now()), None);
    }

    #[test]
    fn new_note_is_trimmed_and_dated_now() {
        let mut form = NoteForm::for_new();
        form.title = "  Built my first website! ".to_string();
        form.summary = " HTML and CSS ".to_string();
        form.cycle_emoji(true);
        form.toggle_tag("HTML");

        let Some(FormOutcome::Create(draft)) = form.submit(now()) else {
            panic!("expected a new draft");
        };
        assert_eq!(draft.title, "Built my first website!");
        assert_eq!(draft.summary, "HTML and CSS");
        assert_eq!(draft.date, "2024-01-10T09:00:00.000Z");
        assert_eq!(draft.emoji, "😕");
        assert_eq!(draft.tags, vec!["HTML"]);
    }

    #[test]
    fn edit_keeps_id_color_and_date() {
        let mut form = NoteForm::for_edit(&existing());
        assert_eq!(form.title, "Old");
        assert_eq!(form.emoji(), "🚀");
        assert_eq!(form.editing_id(), Some("42"));

        form.title = "New".to_string();
        let Some(FormOutcome::Update(entry)) = form.submit(now()) else {
            panic!("expected an update");
        };
        assert_eq!(entry.id, "42");
        assert_eq!(entry.color, "bg-pink-100 border-pink-200");
        assert_eq!(entry.date, "2024-01-01T08:00:00.000Z");
        assert_eq!(entry.title, "New");
        assert_eq!(entry.tags, vec!["Art"]);
    }

    #[test]
    fn edit_keeps_emoji_outside_the_offered_set() {
        let mut entry = existing();
        entry.emoji = "🦀".to_string();
        let mut form = NoteForm::for_edit(&entry);
        assert_eq!(form.emoji(), "🦀");

        form.title = "New".to_string();
        let Some(FormOutcome::Update(saved)) = form.submit(now()) else {
            panic!("expected an update");
        };
        assert_eq!(saved.emoji, "🦀");

        form.cycle_emoji(true);
        assert_eq!(form.emoji(), EMOJI_OPTIONS[0]);
    }

    #[test]
    fn toggling_a_tag_twice_removes_it() {
        let mut form = NoteForm::for_new();
        form.toggle_tag("Math");
        form.toggle_tag("CSS");
        form.toggle_tag("Math");
        assert_eq!(form.tags, vec!["CSS"]);
    }

    #[test]
    fn custom_tag_is_trimmed_and_deduplicated() {
        let mut form = NoteForm::for_new();
        form.custom_tag = "  Chess ".to_string();
        assert!(form.add_custom_tag());
        assert_eq!(form.tags, vec!["Chess"]);
        assert!(form.custom_tag.is_empty());

        form.custom_tag = "Chess".to_string();
        assert!(!form.add_custom_tag());
        assert_eq!(form.custom_tag, "Chess");

        form.custom_tag = "chess".to_string();
        assert!(form.add_custom_tag());
        assert_eq!(form.tags, vec!["Chess", "chess"]);

        form.custom_tag = "   ".to_string();
        assert!(!form.add_custom_tag());
    }

    #[test]
    fn preset_cursor_wraps_and_toggles() {
        let mut form = NoteForm::for_new();
        form.move_preset_cursor(false);
        assert_eq!(form.preset_cursor, TAG_PRESETS.len() - 1);
        form.toggle_preset_under_cursor();
        assert_eq!(form.tags, vec!["Art"]);
    }

    #[test]
    fn focus_cycles_through_fields() {
        let mut field = FormField::Title;
        for _ in 0..5 {
            field = field.next();
        }
        assert_eq!(field, FormField::Title);
        assert_eq!(FormField::Title.previous(), FormField::CustomTag);
    }
}
