//! todo-tracker - keep TODO comments and GitHub issues in sync
//!
//! Scans a directory tree for TODO comments (any casing), fingerprints each one
//! and reconciles them against issues on a tracker: new TODOs get an issue,
//! known ones are skipped, and issues whose TODO disappeared can be closed.
//!
//! # Example
//!
//! ```rust,no_run
//! use todo_tracker::*;
//! use std::path::Path;
//!
//! let config = config::load_config(None).unwrap();
//! let rules = config::ScanConfig::from_config(&config, &[], &[]).unwrap();
//!
//! let todos = scanner::scan_directory(Path::new("."), &rules).unwrap();
//! let summary = scanner::summarize(&todos);
//! println!("{} TODOs in {} files", summary.total_todos, summary.files_with_todos);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod issue;
pub mod models;
pub mod reconciler;
pub mod reporter;
pub mod scanner;
pub mod tracker;

// Re-export commonly used types
pub use error::{ScanError, TrackerError};
pub use models::{Config, IssueState, RepositoryInfo, TodoOccurrence, TodoSummary, TrackedIssue};
pub use reconciler::{ReconcileOutcome, Reconciler};
pub use tracker::IssueTracker;
