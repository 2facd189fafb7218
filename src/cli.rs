use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "todo-tracker")]
#[command(version, about = "Scan repositories for TODOs and track them as GitHub issues", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Parser, Debug)]
pub enum Commands {
    /// Scan a repository and create GitHub issues for new TODOs
    Track(TrackArgs),
    /// Scan a repository for TODOs without touching GitHub
    Scan(ScanArgs),
    /// Write the default configuration to a file
    InitConfig(InitConfigArgs),
}

/// Ignore options shared by every scanning command
#[derive(Args, Debug, Default)]
pub struct IgnoreArgs {
    /// Additional directories to ignore (can be specified multiple times)
    #[arg(long = "ignore-dirs", num_args = 1..)]
    pub ignore_dirs: Vec<String>,

    /// Additional file patterns to ignore (can be specified multiple times)
    #[arg(long = "ignore-patterns", num_args = 1..)]
    pub ignore_patterns: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct TrackArgs {
    /// Path to the repository to scan
    #[arg(long, default_value = ".")]
    pub repo_path: PathBuf,

    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// GitHub repository as owner/repo (inferred from the origin remote if omitted)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo_name: Option<String>,

    /// Show what would be created without creating issues
    #[arg(long)]
    pub dry_run: bool,

    /// Close issues for TODOs that no longer exist in the codebase
    #[arg(long)]
    pub close_resolved: bool,

    #[command(flatten)]
    pub ignore: IgnoreArgs,

    /// Path to custom config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Directory to scan (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    #[command(flatten)]
    pub ignore: IgnoreArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (if not specified, writes to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to custom config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct InitConfigArgs {
    /// Where to write the config file
    #[arg(default_value = ".todo-tracker.toml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Summary table and one line per TODO
    Terminal,
    /// JSON format
    Json,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        match &self.command {
            Commands::Track(args) => args.verbose,
            Commands::Scan(args) => args.verbose,
            Commands::InitConfig(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_track_args() {
        let cli = Cli::try_parse_from([
            "todo-tracker",
            "track",
            "--github-token",
            "secret",
            "--repo-name",
            "owner/repo",
            "--dry-run",
            "--ignore-dirs",
            "build",
            "dist",
            "--ignore-patterns",
            "*.min.js",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose());
        let Commands::Track(args) = cli.command else {
            panic!("expected track command");
        };
        assert_eq!(args.github_token, "secret");
        assert_eq!(args.repo_name.as_deref(), Some("owner/repo"));
        assert!(args.dry_run);
        assert!(!args.close_resolved);
        assert_eq!(args.ignore.ignore_dirs, vec!["build", "dist"]);
        assert_eq!(args.ignore.ignore_patterns, vec!["*.min.js"]);
        assert_eq!(args.repo_path, PathBuf::from("."));
    }

    #[test]
    fn test_parse_scan_args() {
        let cli = Cli::try_parse_from(["todo-tracker", "scan", "src", "--format", "json"]).unwrap();
        let Commands::Scan(args) = cli.command else {
            panic!("expected scan command");
        };
        assert_eq!(args.path, PathBuf::from("src"));
        assert!(matches!(args.format, OutputFormat::Json));
        assert!(args.ignore.ignore_dirs.is_empty());
    }
}
