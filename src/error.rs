use std::path::PathBuf;

/// Errors that abort a scan before any file is read
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Directory does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Errors reported by an issue tracker
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tracker API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid repository name '{0}', expected owner/repo")]
    InvalidRepository(String),

    #[error("Token contains characters that are not allowed in an HTTP header")]
    InvalidToken,

    #[error("Invalid tracker URL: {0}")]
    Url(String),
}

impl TrackerError {
    /// True when the tracker answered 404 Not Found
    pub fn is_not_found(&self) -> bool {
        matches!(self, TrackerError::Api { status: 404, .. })
    }
}
