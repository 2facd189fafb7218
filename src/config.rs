use crate::error::ScanError;
use crate::models::{Config, TrackerConfig, merge_unique};
use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = ".todo-tracker.toml";

/// Load configuration from file or use defaults
///
/// Search order:
/// 1. Custom path if provided via --config
/// 2. .todo-tracker.toml in current directory
/// 3. ~/.todo-tracker.toml in home directory
/// 4. Built-in defaults
pub fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    // If custom path provided, use it exclusively
    if let Some(path) = custom_path {
        return load_config_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let current_config = PathBuf::from(CONFIG_FILE_NAME);
    if current_config.exists() {
        match load_config_from_file(&current_config) {
            Ok(config) => return Ok(config),
            Err(e) => tracing::warn!("Ignoring {}: {:#}", current_config.display(), e),
        }
    }

    if let Some(home_config) = get_home_config_path() {
        if home_config.exists() {
            match load_config_from_file(&home_config) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!("Ignoring {}: {:#}", home_config.display(), e),
            }
        }
    }

    Ok(Config::default())
}

/// Load config from a specific file
fn load_config_from_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

fn get_home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Save a config to a file (used by `init-config`)
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

impl TrackerConfig {
    /// Parse the humantime timeout string
    pub fn request_timeout(&self) -> Result<Duration> {
        humantime::parse_duration(&self.timeout)
            .with_context(|| format!("Invalid tracker timeout: {}", self.timeout))
    }
}

/// Ignore rules for a single scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub ignored_dirs: HashSet<String>,
    pub ignored_patterns: Vec<Pattern>,
    pub max_file_size: Option<u64>,
    pub respect_gitignore: bool,
}

impl ScanConfig {
    /// Build scan rules from the loaded config plus caller-supplied extras
    pub fn from_config(
        config: &Config,
        extra_dirs: &[String],
        extra_patterns: &[String],
    ) -> Result<Self, ScanError> {
        let ignored_patterns = merge_unique(&config.ignored_patterns, extra_patterns)
            .into_iter()
            .map(|pattern| {
                Pattern::new(&pattern)
                    .map_err(|source| ScanError::InvalidPattern { pattern, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            ignored_dirs: config
                .ignored_dirs
                .iter()
                .chain(extra_dirs.iter())
                .cloned()
                .collect(),
            ignored_patterns,
            max_file_size: config.max_file_size,
            respect_gitignore: config.respect_gitignore,
        })
    }

    /// Whether a directory with this base name is pruned from the walk
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignored_dirs.contains(name)
    }

    /// Whether a file is skipped; `relative` is the path below the scan root.
    ///
    /// Patterns without a separator match the file name, others the relative path.
    pub fn is_ignored_file(&self, relative: &Path) -> bool {
        let file_name = relative
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };

        self.ignored_patterns.iter().any(|pattern| {
            if pattern.as_str().contains('/') {
                pattern.matches_path_with(relative, options)
            } else {
                pattern.matches(&file_name)
            }
        })
    }
}
