use git2::Repository;
use std::path::Path;

/// Walk upward from `start` to the first directory containing `.git`.
///
/// `.git` may be a directory or, for worktrees and submodules, a file.
pub fn find_repository_root(start: &Path) -> Option<&Path> {
    start.ancestors().find(|dir| dir.join(".git").exists())
}

/// Infer `owner/repo` from the `origin` remote of the repository containing `path`
pub fn remote_repo_slug(path: &Path) -> Option<String> {
    let repo = match Repository::discover(path) {
        Ok(repo) => repo,
        Err(_) => return None, // Not a git repository - this is okay
    };

    let remote = repo.find_remote("origin").ok()?;
    let url = remote.url()?;
    let slug = parse_remote_url(url);
    if slug.is_none() {
        tracing::debug!("Could not derive owner/repo from remote URL {}", url);
    }
    slug
}

/// Extract `owner/repo` from https, ssh and scp-style remote URLs
pub fn parse_remote_url(url: &str) -> Option<String> {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    let path = if let Some((_, rest)) = url.split_once("://") {
        // https://host/owner/repo, ssh://git@host:22/owner/repo
        rest.split_once('/')?.1
    } else {
        // git@host:owner/repo
        url.split_once(':')?.1
    };

    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let repo = segments.next()?;
    let owner = segments.next()?;
    Some(format!("{}/{}", owner, repo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_remote_url() {
        assert_eq!(
            parse_remote_url("https://github.com/owner/repo.git"),
            Some("owner/repo".to_string())
        );
        assert_eq!(
            parse_remote_url("https://github.com/owner/repo/"),
            Some("owner/repo".to_string())
        );
        assert_eq!(
            parse_remote_url("git@github.com:owner/repo.git"),
            Some("owner/repo".to_string())
        );
        assert_eq!(
            parse_remote_url("ssh://git@github.com:22/owner/repo"),
            Some("owner/repo".to_string())
        );
        assert_eq!(parse_remote_url("https://github.com/"), None);
        assert_eq!(parse_remote_url("not a url"), None);
    }

    #[test]
    fn test_find_repository_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("repo");
        let nested = root.join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();

        assert_eq!(find_repository_root(&nested), Some(root.as_path()));
        assert_eq!(find_repository_root(&root), Some(root.as_path()));
    }

    #[test]
    fn test_remote_repo_slug() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        assert_eq!(remote_repo_slug(temp_dir.path()), None);

        repo.remote("origin", "git@github.com:acme/widgets.git").unwrap();
        fs::create_dir_all(temp_dir.path().join("src")).unwrap();
        assert_eq!(
            remote_repo_slug(&temp_dir.path().join("src")),
            Some("acme/widgets".to_string())
        );
    }
}
