use serde::{Deserialize, Serialize};

/// Mood glyphs offered by the note form. The first one is the default.
pub const EMOJI_OPTIONS: [&str; 8] = ["😊", "😕", "😍", "🤔", "🎉", "💡", "🚀", "⭐"];

/// Tags offered as one-tap chips in the note form.
pub const TAG_PRESETS: [&str; 8] = [
    "HTML",
    "CSS",
    "JavaScript",
    "Python",
    "Robotics",
    "Math",
    "Science",
    "Art",
];

/// Card color tokens. An entry gets one at creation and keeps it forever.
///
/// The token strings match what the browser build of the journal stored, so a blob exported
/// from there loads unchanged.
pub const COLOR_PALETTE: [&str; 8] = [
    "bg-mint-100 border-mint-200",
    "bg-peach-100 border-peach-200",
    "bg-sky-100 border-sky-200",
    "bg-purple-100 border-purple-200",
    "bg-yellow-100 border-yellow-200",
    "bg-pink-100 border-pink-200",
    "bg-orange-100 border-orange-200",
    "bg-green-100 border-green-200",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    /// ISO-8601 timestamp, kept as text so foreign or hand-edited values survive a round trip.
    pub date: String,
    pub summary: String,
    pub emoji: String,
    pub tags: Vec<String>,
    pub color: String,
}

/// Everything the caller supplies when creating an entry; id and color are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub date: String,
    pub summary: String,
    pub emoji: String,
    pub tags: Vec<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, date: impl Into<String>, summary: impl Into<String>) -> Self {
        NoteDraft {
            title: title.into(),
            date: date.into(),
            summary: summary.into(),
            emoji: EMOJI_OPTIONS[0].to_string(),
            tags: Vec::new(),
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn into_entry(self, id: String, color: String) -> JournalEntry {
        JournalEntry {
            id,
            title: self.title,
            date: self.date,
            summary: self.summary,
            emoji: self.emoji,
            tags: dedup_tags(self.tags),
            color,
        }
    }
}

/// Appends `tag` unless an identical (case-sensitive) tag is already present.
/// Returns whether the tag was added.
pub fn push_unique_tag(tags: &mut Vec<String>, tag: &str) -> bool {
    if tags.iter().any(|t| t == tag) {
        return false;
    }
    tags.push(tag.to_string());
    true
}

/// Drops repeated tags, keeping the first occurrence of each.
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut unique = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}
