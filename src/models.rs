use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// A single TODO comment found in the codebase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoOccurrence {
    /// Path to the file containing the TODO, as produced by the scanner
    pub file_path: PathBuf,

    /// Line number where the TODO was found (1-indexed)
    pub line_number: usize,

    /// The marker exactly as written (TODO, todo, ToDo, ...)
    pub raw_marker: String,

    /// Text following the marker, or the whole trimmed line when nothing follows
    pub content: String,
}

/// Aggregate counts over a set of occurrences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoSummary {
    pub total_todos: usize,
    pub files_with_todos: usize,
    /// Occurrences per marker casing
    pub todo_types: BTreeMap<String, usize>,
    /// Occurrences per file
    pub files: BTreeMap<PathBuf, usize>,
}

impl TodoSummary {
    pub fn new(occurrences: &[TodoOccurrence]) -> Self {
        let mut todo_types: BTreeMap<String, usize> = BTreeMap::new();
        let mut files: BTreeMap<PathBuf, usize> = BTreeMap::new();

        for todo in occurrences {
            *todo_types.entry(todo.raw_marker.clone()).or_insert(0) += 1;
            *files.entry(todo.file_path.clone()).or_insert(0) += 1;
        }

        Self {
            total_todos: occurrences.len(),
            files_with_todos: files.len(),
            todo_types,
            files,
        }
    }
}

/// Everything produced by one scan, used by the scan-only report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_path: PathBuf,
    pub scan_time: DateTime<Utc>,
    pub summary: TodoSummary,
    pub todos: Vec<TodoOccurrence>,
}

impl ScanReport {
    pub fn new(todos: Vec<TodoOccurrence>, scan_path: PathBuf) -> Self {
        Self {
            summary: TodoSummary::new(&todos),
            todos,
            scan_path,
            scan_time: Utc::now(),
        }
    }
}

/// Open/closed state of a remote issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

/// An issue living on the remote tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedIssue {
    /// Tracker-assigned issue number
    pub number: u64,
    pub title: String,
    pub body: String,
    pub state: IssueState,
    /// Browser URL of the issue, empty if the tracker does not provide one
    #[serde(default)]
    pub html_url: String,
}

/// Read-only metadata about the target repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub url: String,
    pub default_branch: String,
}

/// Configuration for todo-tracker
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Directory names that are never descended into
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,

    /// Glob patterns for files that are never read
    #[serde(default = "default_ignored_patterns")]
    pub ignored_patterns: Vec<String>,

    /// Optional size cap in bytes; unset means every file is read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,

    /// Also honour .gitignore and .ignore files while walking
    #[serde(default)]
    pub respect_gitignore: bool,

    #[serde(default)]
    pub tracker: TrackerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignored_dirs: default_ignored_dirs(),
            ignored_patterns: default_ignored_patterns(),
            max_file_size: None,
            respect_gitignore: false,
            tracker: TrackerConfig::default(),
        }
    }
}

/// Issue tracker settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackerConfig {
    /// Label attached to every issue created by the tool
    #[serde(default = "default_label")]
    pub label: String,

    #[serde(default = "default_label_color")]
    pub label_color: String,

    #[serde(default = "default_label_description")]
    pub label_description: String,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout (e.g. "30s", "2m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            label_color: default_label_color(),
            label_description: default_label_description(),
            api_url: default_api_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_ignored_dirs() -> Vec<String> {
    vec![
        ".git".to_string(),
        "__pycache__".to_string(),
        "node_modules".to_string(),
        ".pytest_cache".to_string(),
    ]
}

fn default_ignored_patterns() -> Vec<String> {
    vec!["*.pyc".to_string(), "*.log".to_string(), "*.tmp".to_string()]
}

fn default_label() -> String {
    "todo-tracker".to_string()
}

fn default_label_color() -> String {
    "d4c5f9".to_string()
}

fn default_label_description() -> String {
    "Issues created automatically from TODO comments".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_timeout() -> String {
    "30s".to_string()
}

/// Merge two name lists, keeping the first occurrence of each entry
pub(crate) fn merge_unique(base: &[String], extra: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::new();
    for item in base.iter().chain(extra) {
        if seen.insert(item) {
            merged.push(item.clone());
        }
    }
    merged
}
