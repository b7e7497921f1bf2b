use chrono::{DateTime, Utc};

/// Inclusive `--from` / `--to` bounds on an entry's capture time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        if let Some(from) = self.from
            && *timestamp < from
        {
            return false;
        }
        if let Some(to) = self.to
            && *timestamp > to
        {
            return false;
        }
        true
    }
}

/// Filters applied to every `*.history.json` entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub feature: Option<String>,
    pub on: Option<DateTime<Utc>>,
    pub range: TimeRange,
}
