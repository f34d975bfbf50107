use crate::journal_entry::JournalEntry;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Key under which the whole entry collection is stored.
pub const ENTRIES_KEY: &str = "journalEntries";

/// Synchronous string blob storage keyed by name.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<key>.json` inside a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileKeyValueStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).wrap_err_with(|| format!("reading {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .wrap_err_with(|| format!("creating {}", self.dir.display()))?;

        // Write next to the target and rename over it so readers never see a partial blob.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).wrap_err_with(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).wrap_err_with(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}

/// Serializes the entry collection as one JSON array under [`ENTRIES_KEY`].
pub struct Persistence<S> {
    storage: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Persistence { storage }
    }

    /// Missing, unreadable and corrupt blobs all load as an empty collection.
    pub fn load(&self) -> Vec<JournalEntry> {
        let raw = match self.storage.get(ENTRIES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no saved entries found");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "could not read saved entries, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<JournalEntry>>(&raw) {
            Ok(entries) => {
                debug!(count = entries.len(), "loaded entries");
                entries
            }
            Err(e) => {
                warn!(error = %e, "saved entries are not valid, starting empty");
                Vec::new()
            }
        }
    }

    pub fn save(&mut self, entries: &[JournalEntry]) -> Result<()> {
        let serialized = serde_json::to_string(entries)?;
        self.storage.set(ENTRIES_KEY, &serialized)
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;
    use crate::journal_entry::{NoteDraft, COLOR_PALETTE};
    use tempfile::tempdir;

    fn sample_entries() -> Vec<JournalEntry> {
        vec![
            NoteDraft::new("Built a site", "2024-01-10T09:00:00.000Z", "Used HTML")
                .with_emoji("🚀")
                .with_tags(["HTML", "CSS"])
                .into_entry("2".to_string(), COLOR_PALETTE[0].to_string()),
            NoteDraft::new("Learned loops", "2024-01-09T15:30:00.000Z", "Python basics")
                .with_tags(["Python"])
                .into_entry("1".to_string(), COLOR_PALETTE[5].to_string()),
        ]
    }

    #[test]
    fn save_then_load_reproduces_collection() {
        let mut persistence = Persistence::new(MemoryStore::default());
        let entries = sample_entries();
        persistence.save(&entries).unwrap();
        assert_eq!(persistence.load(), entries);
    }

    #[test]
    fn missing_key_loads_empty() {
        let persistence = Persistence::new(MemoryStore::default());
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        let persistence = Persistence::new(MemoryStore::with_value(ENTRIES_KEY, "{not json"));
        assert!(persistence.load().is_empty());

        let wrong_shape = Persistence::new(MemoryStore::with_value(ENTRIES_KEY, r#"{"id":"1"}"#));
        assert!(wrong_shape.load().is_empty());
    }

    #[test]
    fn save_overwrites_previous_value() {
        let mut persistence = Persistence::new(MemoryStore::default());
        persistence.save(&sample_entries()).unwrap();
        persistence.save(&[]).unwrap();
        assert_eq!(persistence.storage().values[ENTRIES_KEY], "[]");
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn reads_blob_written_by_browser_build() {
        let raw = r#"[{"id":"1704877200000","title":"Robot arm","date":"2024-01-10T09:00:00.000Z","summary":"Servo angles","emoji":"🤔","tags":["Robotics"],"color":"bg-sky-100 border-sky-200"}]"#;
        let persistence = Persistence::new(MemoryStore::with_value(ENTRIES_KEY, raw));
        let entries = persistence.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Robot arm");
        assert_eq!(entries[0].tags, vec!["Robotics"]);
        assert_eq!(entries[0].color, "bg-sky-100 border-sky-200");
    }

    #[test]
    fn file_store_round_trips_and_creates_directory() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("nested").join("journal");
        let mut persistence = Persistence::new(FileKeyValueStore::new(&dir));
        assert!(persistence.load().is_empty());

        let entries = sample_entries();
        persistence.save(&entries).unwrap();
        assert!(dir.join("journalEntries.json").exists());
        assert!(!dir.join(".journalEntries.json.tmp").exists());

        let reopened = Persistence::new(FileKeyValueStore::new(&dir));
        assert_eq!(reopened.load(), entries);
    }

    #[test]
    fn file_store_reports_missing_key_as_none() {
        let tmp = tempdir().unwrap();
        let store = FileKeyValueStore::new(tmp.path());
        assert_eq!(store.get("nothing").unwrap(), None);
    }
}
