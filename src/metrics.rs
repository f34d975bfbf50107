use crate::journal_entry::JournalEntry;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Notes per week that fill the progress bar.
pub const WEEKLY_GOAL: usize = 7;

const MAX_STARS: usize = 5;

/// Number of entries dated within the seven days up to `now`. Unparsable dates don't count.
pub fn weekly_count(entries: &[JournalEntry], now: DateTime<Utc>) -> usize {
    let week_ago = now - Duration::days(7);
    entries
        .iter()
        .filter_map(|e| parse_entry_date(&e.date))
        .filter(|date| *date >= week_ago)
        .count()
}

/// Accepts RFC 3339, a zone-less `YYYY-MM-DDTHH:MM:SS[.fff]` and a bare `YYYY-MM-DD`.
/// Anything without an offset is taken as UTC, whereas a browser's `Date` reads a zone-less
/// date-time as local time, so counts near the window edge can differ by the UTC offset.
pub fn parse_entry_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressLevel {
    Idle,
    Warming,
    OnFire,
    Champion,
}

/// What the header shows about this week's writing.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub count: usize,
    pub level: ProgressLevel,
    pub message: String,
    /// Fill of the bar in `0.0..=1.0`.
    pub ratio: f64,
    pub stars: usize,
}

impl Progress {
    pub fn from_count(count: usize) -> Self {
        let level = match count {
            0 => ProgressLevel::Idle,
            1..=2 => ProgressLevel::Warming,
            3..=4 => ProgressLevel::OnFire,
            _ => ProgressLevel::Champion,
        };
        let message = match level {
            ProgressLevel::Idle => "Start your learning journey! 🚀".to_string(),
            ProgressLevel::Warming => {
                let noun = if count == 1 { "note" } else { "notes" };
                format!("{count} {noun} this week! Keep going! 💪")
            }
            ProgressLevel::OnFire => format!("{count} notes this week! You're on fire! 🔥"),
            ProgressLevel::Champion => format!("{count} notes this week! Learning champion! 🏆"),
        };

        Progress {
            count,
            level,
            message,
            ratio: (count as f64 / WEEKLY_GOAL as f64).min(1.0),
            stars: count.min(MAX_STARS),
        }
    }
}
