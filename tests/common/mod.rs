//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use serde_json::{Value, json};
use tempfile::TempDir;

const SECS_PER_DAY: u64 = 86_400;

/// Set a path's mtime to `age_days` days ago
pub fn set_age_days(path: &Path, age_days: u64) {
    let mtime = SystemTime::now() - Duration::from_secs(age_days * SECS_PER_DAY);
    filetime::set_file_mtime(path, FileTime::from_system_time(mtime)).expect("Failed to set mtime");
}

/// Builder for a workspace root with state/runs, state/cd and research/
pub struct WorkspaceBuilder {
    temp_dir: TempDir,
}

impl WorkspaceBuilder {
    /// Create a new builder with an empty workspace root
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.temp_dir.path().join("state").join("runs")
    }

    pub fn deployments_dir(&self) -> PathBuf {
        self.temp_dir.path().join("state").join("cd")
    }

    pub fn research_dir(&self) -> PathBuf {
        self.temp_dir.path().join("research")
    }

    /// Add a run archive last modified `age_days` ago
    pub fn with_run(self, name: &str, age_days: u64) -> Self {
        let dir = self.runs_dir().join(name);
        fs::create_dir_all(&dir).expect("Failed to create run dir");
        fs::write(dir.join("summary.json"), r#"{"status":"ok"}"#).expect("Failed to write run");
        set_age_days(&dir, age_days);
        self
    }

    /// Add a run archive carrying the `prod` promotion marker
    pub fn with_promoted_run(self, name: &str, age_days: u64) -> Self {
        let builder = self.with_run(name, age_days);
        let dir = builder.runs_dir().join(name);
        fs::create_dir_all(dir.join("prod")).expect("Failed to create prod marker");
        set_age_days(&dir, age_days);
        builder
    }

    /// Add a deployment record, optionally carrying a `prod` marker
    pub fn with_deployment(self, name: &str, age_days: u64, promoted: bool) -> Self {
        let dir = self.deployments_dir().join(name);
        fs::create_dir_all(&dir).expect("Failed to create deployment dir");
        if promoted {
            fs::create_dir_all(dir.join("prod")).expect("Failed to create prod marker");
        }
        set_age_days(&dir, age_days);
        self
    }

    /// Add a research document at `relative` (under research/)
    pub fn with_document(self, relative: &str, content: impl AsRef<[u8]>) -> Self {
        let path = self.research_dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create document dir");
        }
        fs::write(path, content).expect("Failed to write document");
        self
    }

    /// Add a `<name>.history.json` document with the given entries
    pub fn with_history(self, name: &str, entries: &[HistoryEntryBuilder]) -> Self {
        let entries: Vec<Value> = entries.iter().map(|e| e.to_json()).collect();
        let document = json!({ "entries": entries });
        self.with_document(&format!("{name}.history.json"), document.to_string())
    }

    /// Create an empty research directory
    pub fn with_empty_research(self) -> Self {
        fs::create_dir_all(self.research_dir()).expect("Failed to create research dir");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for WorkspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one history entry
#[derive(Clone, Default)]
pub struct HistoryEntryBuilder {
    fields: serde_json::Map<String, Value>,
}

impl HistoryEntryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feature_slug(self, slug: &str) -> Self {
        self.field("featureSlug", json!(slug))
    }

    pub fn feature_id(self, id: &str) -> Self {
        self.field("featureId", json!(id))
    }

    pub fn captured_at(self, timestamp: &str) -> Self {
        self.field("capturedAt", json!(timestamp))
    }

    pub fn validity(self, start: &str, end: Option<&str>) -> Self {
        let window = match end {
            Some(end) => json!({ "start": start, "end": end }),
            None => json!({ "start": start }),
        };
        self.field("validity", window)
    }

    pub fn note(self, note: &str) -> Self {
        self.field("note", json!(note))
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// Workspace with three feature history files spanning early 2024
pub fn realistic_history_workspace() -> TempDir {
    WorkspaceBuilder::new()
        .with_history(
            "checkout",
            &[
                HistoryEntryBuilder::new()
                    .feature_slug("checkout")
                    .captured_at("2024-01-01")
                    .note("january"),
                HistoryEntryBuilder::new()
                    .feature_slug("checkout")
                    .captured_at("2024-02-01")
                    .note("february"),
                HistoryEntryBuilder::new()
                    .feature_slug("checkout")
                    .captured_at("2024-03-01")
                    .note("march"),
            ],
        )
        .with_history(
            "nested/search",
            &[HistoryEntryBuilder::new()
                .feature_id("search")
                .validity("2024-01-01", Some("2024-01-31"))
                .note("search window")],
        )
        .build()
}
