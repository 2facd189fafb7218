//! Issue text for tracked TODOs.
//!
//! The issue body is the only state persisted between runs. Previously created
//! issues are recognised by the trailing line
//!
//! ```text
//! *TODO Hash: `1a2b3c4d`*
//! ```
//!
//! so its exact shape must not change. New bodies also carry a hidden
//! `<!-- todo-tracker:hash=1a2b3c4d -->` comment, which is accepted as a fallback
//! when the trailing line has been edited away.

use crate::git;
use crate::models::{RepositoryInfo, TodoOccurrence};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::path::{Component, Path};
use std::sync::LazyLock;

/// Number of hex characters kept from the SHA-256 digest
pub const FINGERPRINT_LEN: usize = 8;

/// Title content is cut to this many characters
const TITLE_CONTENT_LIMIT: usize = 50;

static HASH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*TODO Hash: `([0-9a-f]{8})`\*").expect("Invalid hash line regex")
});

static HASH_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*todo-tracker:hash=([0-9a-f]{8})\s*-->").expect("Invalid hash comment regex")
});

/// Deterministic identity of a TODO: `sha256("path:line:content")`, truncated
pub fn fingerprint(todo: &TodoOccurrence) -> String {
    let key = format!(
        "{}:{}:{}",
        todo.file_path.display(),
        todo.line_number,
        todo.content
    );
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..FINGERPRINT_LEN].to_string()
}

/// Find the fingerprint embedded in an issue body
pub fn extract_fingerprint(body: &str) -> Option<String> {
    HASH_LINE
        .captures(body)
        .or_else(|| HASH_COMMENT.captures(body))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Title and body ready to be sent to the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub fingerprint: String,
    pub title: String,
    pub body: String,
}

impl IssueDraft {
    pub fn new(todo: &TodoOccurrence, repo: &RepositoryInfo) -> Self {
        let fingerprint = fingerprint(todo);
        Self {
            title: issue_title(todo),
            body: issue_body(todo, &fingerprint, repo),
            fingerprint,
        }
    }
}

/// `TODO: <content, max 50 chars>... (<file name>:<line>)`
pub fn issue_title(todo: &TodoOccurrence) -> String {
    let file_name = todo
        .file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| todo.file_path.display().to_string());

    let mut summary: String = todo.content.chars().take(TITLE_CONTENT_LIMIT).collect();
    if todo.content.chars().count() > TITLE_CONTENT_LIMIT {
        summary.push_str("...");
    }

    format!("TODO: {} ({}:{})", summary, file_name, todo.line_number)
}

/// Markdown body of a TODO issue
pub fn issue_body(todo: &TodoOccurrence, fingerprint: &str, repo: &RepositoryInfo) -> String {
    let link_path = link_path(&todo.file_path);

    let lines = [
        "## TODO Found in Code".to_string(),
        String::new(),
        format!("**File:** `{}`  ", todo.file_path.display()),
        format!("**Line:** {}  ", todo.line_number),
        format!("**Type:** `{}`  ", todo.raw_marker),
        String::new(),
        "### Content".to_string(),
        "```".to_string(),
        todo.content.clone(),
        "```".to_string(),
        String::new(),
        "### Location".to_string(),
        format!(
            "[View in repository]({}/blob/{}/{}#L{})",
            repo.url.trim_end_matches('/'),
            repo.default_branch,
            link_path,
            todo.line_number
        ),
        String::new(),
        format!("<!-- todo-tracker:hash={} -->", fingerprint),
        "---".to_string(),
        "*This issue was automatically created by the TODO Tracker.*  ".to_string(),
        format!("*TODO Hash: `{}`*", fingerprint),
    ];

    let mut body = lines.join("\n");
    body.push('\n');
    body
}

/// Path used in the repository link, with forward slashes.
///
/// Absolute paths are made relative to the enclosing repository root when one
/// is found; otherwise the path is used as given.
pub fn link_path(file_path: &Path) -> String {
    let relative = if file_path.is_absolute() {
        file_path
            .parent()
            .and_then(git::find_repository_root)
            .and_then(|root| file_path.strip_prefix(root).ok())
            .unwrap_or(file_path)
    } else {
        file_path
    };

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::CurDir => None,
            Component::RootDir | Component::Prefix(_) => Some(String::new()),
            other => Some(other.as_os_str().to_string_lossy().into_owned()),
        })
        .collect();
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn todo(path: &str, line: usize, content: &str) -> TodoOccurrence {
        TodoOccurrence {
            file_path: PathBuf::from(path),
            line_number: line,
            raw_marker: "TODO".to_string(),
            content: content.to_string(),
        }
    }

    fn repo() -> RepositoryInfo {
        RepositoryInfo {
            name: "repo".to_string(),
            full_name: "owner/repo".to_string(),
            description: String::new(),
            url: "https://github.com/owner/repo".to_string(),
            default_branch: "main".to_string(),
        }
    }

    #[test]
    fn test_fingerprint_is_truncated_sha256() {
        let item = todo("test.py", 10, "Fix this bug");

        let mut hasher = Sha256::new();
        hasher.update(b"test.py:10:Fix this bug");
        let expected = format!("{:x}", hasher.finalize());

        let hash = fingerprint(&item);
        assert_eq!(hash.len(), FINGERPRINT_LEN);
        assert_eq!(hash, expected[..8]);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_determinism() {
        let a = todo("src/a.rs", 3, "refactor");
        let b = TodoOccurrence {
            raw_marker: "todo".to_string(),
            ..a.clone()
        };
        // The marker casing is not part of the identity
        assert_eq!(fingerprint(&a), fingerprint(&b));

        assert_ne!(fingerprint(&a), fingerprint(&todo("src/b.rs", 3, "refactor")));
        assert_ne!(fingerprint(&a), fingerprint(&todo("src/a.rs", 4, "refactor")));
        assert_ne!(fingerprint(&a), fingerprint(&todo("src/a.rs", 3, "refactor!")));
    }

    #[test]
    fn test_issue_title() {
        let item = todo("src/module/test.py", 42, "Short content");
        assert_eq!(issue_title(&item), "TODO: Short content (test.py:42)");
    }

    #[test]
    fn test_issue_title_truncation() {
        let content = "x".repeat(80);
        let title = issue_title(&todo("a.py", 1, &content));
        assert_eq!(title, format!("TODO: {}... (a.py:1)", "x".repeat(50)));

        let exact = "y".repeat(50);
        let title = issue_title(&todo("a.py", 1, &exact));
        assert_eq!(title, format!("TODO: {} (a.py:1)", exact));
    }

    #[test]
    fn test_issue_title_truncates_on_char_boundary() {
        let content = "é".repeat(60);
        let title = issue_title(&todo("a.py", 1, &content));
        assert!(title.starts_with(&format!("TODO: {}...", "é".repeat(50))));
    }

    #[test]
    fn test_issue_body_fields() {
        let item = todo("src/test.py", 10, "Fix this bug");
        let hash = fingerprint(&item);
        let body = issue_body(&item, &hash, &repo());

        assert!(body.contains("**File:** `src/test.py`  \n"));
        assert!(body.contains("**Line:** 10  \n"));
        assert!(body.contains("**Type:** `TODO`  \n"));
        assert!(body.contains("```\nFix this bug\n```"));
        assert!(body.contains(
            "[View in repository](https://github.com/owner/repo/blob/main/src/test.py#L10)"
        ));
        assert!(body.trim_end().ends_with(&format!("*TODO Hash: `{}`*", hash)));
    }

    #[test]
    fn test_extract_fingerprint_from_generated_body() {
        let draft = IssueDraft::new(&todo("a.rs", 7, "wire it up"), &repo());
        assert_eq!(extract_fingerprint(&draft.body), Some(draft.fingerprint.clone()));
    }

    #[test]
    fn test_extract_fingerprint_legacy_and_fallback() {
        let legacy = "Some text\n\n---\n*This issue was automatically created by the TODO Tracker.*  \n*TODO Hash: `abc12345`*\n";
        assert_eq!(extract_fingerprint(legacy), Some("abc12345".to_string()));

        let comment_only = "edited by hand\n<!-- todo-tracker:hash=0badc0de -->\n";
        assert_eq!(extract_fingerprint(comment_only), Some("0badc0de".to_string()));

        assert_eq!(extract_fingerprint("A regular issue"), None);
        assert_eq!(extract_fingerprint("*TODO Hash: `nothex!!`*"), None);
    }

    #[test]
    fn test_link_path_relative_to_repository_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("project");
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("src/deep")).unwrap();
        let file = root.join("src/deep/main.rs");

        assert_eq!(link_path(&file), "src/deep/main.rs");
    }

    #[test]
    fn test_link_path_relative_input_unchanged() {
        assert_eq!(link_path(Path::new("./src/lib.rs")), "src/lib.rs");
        assert_eq!(link_path(Path::new("src/lib.rs")), "src/lib.rs");
    }
}
