use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::models::{TodoOccurrence, TodoSummary};
use ignore::WalkBuilder;
use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Any casing of "todo", then an optional colon with surrounding whitespace.
///
/// This matches anywhere in a line, including inside words such as "todos".
static TODO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(todo)(?:\s*:?\s*)?(.*)").expect("TODO pattern is a valid regex")
});

/// `\r\n`, `\n` and a lone `\r` all end a line
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("line break pattern is a valid regex"));

/// Scan a directory tree for TODO comments
pub fn scan_directory(
    path: &Path,
    config: &ScanConfig,
) -> Result<Vec<TodoOccurrence>, ScanError> {
    if !path.exists() {
        return Err(ScanError::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ScanError::NotADirectory(path.to_path_buf()));
    }

    let mut todos = Vec::new();

    let mut walker = WalkBuilder::new(path);
    walker
        .hidden(false)
        .parents(config.respect_gitignore)
        .ignore(config.respect_gitignore)
        .git_ignore(config.respect_gitignore)
        .git_global(config.respect_gitignore)
        .git_exclude(config.respect_gitignore)
        .sort_by_file_name(|a, b| a.cmp(b));

    // Prune ignored directories before they are descended into
    let ignored = config.clone();
    walker.filter_entry(move |entry| {
        let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        if !is_dir {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if ignored.is_ignored_dir(&name) {
            debug!("Skipping ignored directory {}", entry.path().display());
            return false;
        }
        true
    });

    for result in walker.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Could not walk entry: {}", e);
                continue;
            }
        };

        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_symlink() {
            // Symlinked files are read through the link; symlinked directories are not entered
            match fs::metadata(entry.path()) {
                Ok(target) if target.is_file() => {}
                Ok(_) => {
                    debug!("Not following symlink {}", entry.path().display());
                    continue;
                }
                Err(e) => {
                    warn!("Could not resolve symlink {}: {}", entry.path().display(), e);
                    continue;
                }
            }
        } else if !file_type.is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
        if config.is_ignored_file(relative) {
            debug!("Skipping ignored file {}", entry.path().display());
            continue;
        }

        if let Some(limit) = config.max_file_size {
            if let Ok(metadata) = fs::metadata(entry.path()) {
                if metadata.len() > limit {
                    warn!(
                        "Skipping {} ({} bytes exceeds max_file_size)",
                        entry.path().display(),
                        metadata.len()
                    );
                    continue;
                }
            }
        }

        todos.extend(scan_file(&normalize_path(entry.path())));
    }

    Ok(todos)
}

/// Scan a single file; unreadable files yield nothing and log a warning
pub fn scan_file(path: &Path) -> Vec<TodoOccurrence> {
    let text = match read_text(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not read file {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    LINE_BREAK
        .split(&text)
        .enumerate()
        .filter_map(|(idx, line)| {
            parse_line(line).map(|(raw_marker, content)| TodoOccurrence {
                file_path: path.to_path_buf(),
                line_number: idx + 1,
                raw_marker,
                content,
            })
        })
        .collect()
}

/// Extract the marker casing and content from a line, if it holds a TODO
pub fn parse_line(line: &str) -> Option<(String, String)> {
    let captures = TODO_PATTERN.captures(line)?;
    let raw_marker = captures.get(1)?.as_str().to_string();
    let content = captures.get(2).map(|m| m.as_str().trim()).unwrap_or("");

    let content = if content.is_empty() {
        line.trim().to_string()
    } else {
        content.to_string()
    };

    Some((raw_marker, content))
}

/// Read a file as UTF-8, falling back to Latin-1 which accepts any byte sequence
fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!("{} is not valid UTF-8, decoding as Latin-1", path.display());
            e.into_bytes().iter().map(|&b| char::from(b)).collect()
        }
    })
}

/// Drop `.` components so `./src/a.rs` is reported as `src/a.rs`
fn normalize_path(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        normalized
    }
}

/// Summarize a set of occurrences
pub fn summarize(todos: &[TodoOccurrence]) -> TodoSummary {
    TodoSummary::new(todos)
}
