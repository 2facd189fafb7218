use crate::error::TrackerError;
use crate::issue::{IssueDraft, extract_fingerprint, fingerprint};
use crate::models::{IssueState, RepositoryInfo, TodoOccurrence, TrackedIssue};
use crate::tracker::IssueTracker;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

const RESOLVED_COMMENT: &str = "This TODO has been resolved or removed from the codebase.";

/// Result of syncing one scan against the tracker
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// Issues created in this pass (always empty for a dry run)
    pub created: Vec<TrackedIssue>,
    /// Fingerprints that already had an issue, open or closed
    pub skipped: Vec<String>,
    /// Drafts for every new TODO, whether or not creation was attempted
    pub planned: Vec<IssueDraft>,
}

/// Keeps tracker issues in line with the TODOs currently in the code
pub struct Reconciler<T: IssueTracker> {
    tracker: T,
    label: String,
    repository: RepositoryInfo,
}

impl<T: IssueTracker> Reconciler<T> {
    /// Start a tracker session: read repository metadata and make sure the
    /// tracking label exists. The label is left alone on a dry run.
    pub fn connect(
        tracker: T,
        label: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self, TrackerError> {
        let label = label.into();
        if dry_run {
            debug!("Dry run, not creating label '{}'", label);
        } else {
            tracker.ensure_label_exists(&label)?;
        }
        let repository = tracker.repository_info()?;

        Ok(Self {
            tracker,
            label,
            repository,
        })
    }

    pub fn repository(&self) -> &RepositoryInfo {
        &self.repository
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fresh snapshot of labelled issues that carry a fingerprint.
    ///
    /// A listing failure is logged and treated as "nothing tracked yet".
    fn tracked_issues(&self) -> Vec<(String, TrackedIssue)> {
        let issues = match self.tracker.list_tracked_issues(&self.label) {
            Ok(issues) => issues,
            Err(e) => {
                warn!("Could not fetch existing issues: {}", e);
                return Vec::new();
            }
        };

        issues
            .into_iter()
            .filter_map(|issue| extract_fingerprint(&issue.body).map(|hash| (hash, issue)))
            .collect()
    }

    /// Create issues for TODOs that have no issue yet
    pub fn reconcile(&self, todos: &[TodoOccurrence], dry_run: bool) -> ReconcileOutcome {
        let existing: HashMap<String, TrackedIssue> = self.tracked_issues().into_iter().collect();
        let mut outcome = ReconcileOutcome::default();

        for todo in todos {
            let hash = fingerprint(todo);
            if existing.contains_key(&hash) {
                outcome.skipped.push(hash);
                continue;
            }

            let draft = IssueDraft::new(todo, &self.repository);

            if dry_run {
                debug!("[DRY RUN] Would create issue: {}", draft.title);
                outcome.planned.push(draft);
                continue;
            }

            match self.tracker.create_issue(&draft.title, &draft.body, &self.label) {
                Ok(issue) => {
                    info!("Created issue #{}: {}", issue.number, issue.title);
                    outcome.created.push(issue);
                }
                Err(e) => warn!("Error creating issue for TODO {}: {}", draft.fingerprint, e),
            }
            outcome.planned.push(draft);
        }

        outcome
    }

    /// Open issues whose TODO is no longer present in `current`
    pub fn find_resolved(&self, current: &[TodoOccurrence]) -> Vec<TrackedIssue> {
        let current_hashes: HashSet<String> = current.iter().map(fingerprint).collect();

        self.tracked_issues()
            .into_iter()
            .filter(|(hash, issue)| {
                issue.state == IssueState::Open && !current_hashes.contains(hash)
            })
            .map(|(_, issue)| issue)
            .collect()
    }

    /// Close every resolved issue and return the ones that were closed.
    ///
    /// A failure on one issue is logged and does not stop the others.
    pub fn close_resolved(&self, current: &[TodoOccurrence]) -> Vec<TrackedIssue> {
        let mut closed = Vec::new();

        for mut issue in self.find_resolved(current) {
            if let Err(e) = self.tracker.edit_issue_state(issue.number, IssueState::Closed) {
                warn!("Error closing issue #{}: {}", issue.number, e);
                continue;
            }
            if let Err(e) = self.tracker.add_comment(issue.number, RESOLVED_COMMENT) {
                warn!("Error commenting on closed issue #{}: {}", issue.number, e);
                continue;
            }

            info!("Closed resolved issue #{}: {}", issue.number, issue.title);
            issue.state = IssueState::Closed;
            closed.push(issue);
        }

        closed
    }
}
