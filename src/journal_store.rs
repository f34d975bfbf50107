use crate::journal_entry::{dedup_tags, JournalEntry, NoteDraft, COLOR_PALETTE};
use crate::persistence::{KeyValueStore, Persistence};
use chrono::Utc;
use rand::seq::SliceRandom;
use tracing::{debug, error, info};

/// Owns the entry collection, newest first. All mutation goes through `add`, `update` and
/// `remove`, and each change is written through to storage immediately.
pub struct JournalStore<S> {
    entries: Vec<JournalEntry>,
    persistence: Persistence<S>,
    last_id: i64,
}

impl<S: KeyValueStore> JournalStore<S> {
    pub fn open(storage: S) -> Self {
        let persistence = Persistence::new(storage);
        let entries = persistence.load();
        info!(count = entries.len(), "journal opened");
        let last_id = entries
            .iter()
            .filter_map(|e| e.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        JournalStore {
            entries,
            persistence,
            last_id,
        }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn add(&mut self, draft: NoteDraft) -> &JournalEntry {
        let id = self.next_id();
        let color = COLOR_PALETTE
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(COLOR_PALETTE[0]);
        let entry = draft.into_entry(id, color.to_string());
        debug!(id = %entry.id, color = %entry.color, "adding entry");

        self.entries.insert(0, entry);
        self.write_through();
        &self.entries[0]
    }

    /// Replaces the entry with the same id in place, keeping its id and color.
    /// Returns `false` and leaves the collection untouched when the id is unknown.
    pub fn update(&mut self, updated: JournalEntry) -> bool {
        let Some(existing) = self.entries.iter_mut().find(|e| e.id == updated.id) else {
            debug!(id = %updated.id, "update ignored, no such entry");
            return false;
        };

        existing.title = updated.title;
        existing.date = updated.date;
        existing.summary = updated.summary;
        existing.emoji = updated.emoji;
        existing.tags = dedup_tags(updated.tags);
        debug!(id = %existing.id, "updated entry");

        self.write_through();
        true
    }

    /// Returns `false` when there was nothing to delete.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            debug!(id, "remove ignored, no such entry");
            return false;
        };

        self.entries.remove(index);
        debug!(id, "removed entry");
        self.write_through();
        true
    }

    /// Millisecond timestamp, bumped past the last issued (or loaded) id if the clock has not
    /// moved on. Once the numeric space is exhausted ids become `<millis>-<n>`.
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut candidate = Some(now.max(self.last_id.saturating_add(1)));
        while let Some(n) = candidate {
            let id = n.to_string();
            if !self.id_taken(&id) {
                self.last_id = n;
                return id;
            }
            candidate = n.checked_add(1);
        }

        self.last_id = i64::MAX;
        (1u64..)
            .map(|n| format!("{now}-{n}"))
            .find(|id| !self.id_taken(id))
            .unwrap_or_else(|| format!("{now}-{}", self.entries.len()))
    }

    fn id_taken(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    fn write_through(&mut self) {
        if let Err(e) = self.persistence.save(&self.entries) {
            error!(error = ?e, "failed to save entries");
        }
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        self.persistence.storage()
    }
}
