use crate::error::TrackerError;
use crate::models::{IssueState, RepositoryInfo, TrackedIssue};

/// Operations the reconciler needs from a remote issue tracker
pub trait IssueTracker {
    /// Metadata of the target repository, used to build source links
    fn repository_info(&self) -> Result<RepositoryInfo, TrackerError>;

    /// All issues carrying `label`, open and closed
    fn list_tracked_issues(&self, label: &str) -> Result<Vec<TrackedIssue>, TrackerError>;

    fn create_issue(
        &self,
        title: &str,
        body: &str,
        label: &str,
    ) -> Result<TrackedIssue, TrackerError>;

    fn edit_issue_state(&self, number: u64, state: IssueState) -> Result<(), TrackerError>;

    fn add_comment(&self, number: u64, text: &str) -> Result<(), TrackerError>;

    /// Create `label` if the repository does not have it yet
    fn ensure_label_exists(&self, label: &str) -> Result<(), TrackerError>;
}

impl<T: IssueTracker + ?Sized> IssueTracker for &T {
    fn repository_info(&self) -> Result<RepositoryInfo, TrackerError> {
        (**self).repository_info()
    }

    fn list_tracked_issues(&self, label: &str) -> Result<Vec<TrackedIssue>, TrackerError> {
        (**self).list_tracked_issues(label)
    }

    fn create_issue(
        &self,
        title: &str,
        body: &str,
        label: &str,
    ) -> Result<TrackedIssue, TrackerError> {
        (**self).create_issue(title, body, label)
    }

    fn edit_issue_state(&self, number: u64, state: IssueState) -> Result<(), TrackerError> {
        (**self).edit_issue_state(number, state)
    }

    fn add_comment(&self, number: u64, text: &str) -> Result<(), TrackerError> {
        (**self).add_comment(number, text)
    }

    fn ensure_label_exists(&self, label: &str) -> Result<(), TrackerError> {
        (**self).ensure_label_exists(label)
    }
}
