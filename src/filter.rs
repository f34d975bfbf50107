use crate::journal_entry::JournalEntry;

/// Entries whose title or summary contains `search` (case-insensitive) and, when
/// `selected_tag` is non-empty, that carry exactly that tag. Input order is kept.
pub fn visible<'a>(
    entries: &'a [JournalEntry],
    search: &str,
    selected_tag: &str,
) -> Vec<&'a JournalEntry> {
    let needle = search.to_lowercase();
    entries
        .iter()
        .filter(|e| {
            e.title.to_lowercase().contains(&needle) || e.summary.to_lowercase().contains(&needle)
        })
        .filter(|e| selected_tag.is_empty() || e.tags.iter().any(|t| t == selected_tag))
        .collect()
}

/// Every tag in use, in order of first appearance.
pub fn all_tags(entries: &[JournalEntry]) -> Vec<&str> {
    let mut tags: Vec<&str> = Vec::new();
    for tag in entries.iter().flat_map(|e| e.tags.iter()) {
        if !tags.contains(&tag.as_str()) {
            tags.push(tag.as_str());
        }
    }
    tags
}
