use anyhow::{Context, Result, bail};
use clap::Parser;
use todo_tracker::Config;
use todo_tracker::config::ScanConfig;
use todo_tracker::github::GitHubClient;
use todo_tracker::models::ScanReport;
use todo_tracker::reconciler::Reconciler;
use todo_tracker::{cli, config, git, reporter, scanner};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = cli::Cli::parse();
    let verbose = cli.verbose();
    init_logging(verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        if verbose {
            eprintln!("{:?}", e);
        }
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug output with --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: cli::Cli) -> Result<()> {
    match cli.command {
        cli::Commands::Track(args) => track_command(args),
        cli::Commands::Scan(args) => scan_command(args),
        cli::Commands::InitConfig(args) => init_config_command(args),
    }
}

fn track_command(args: cli::TrackArgs) -> Result<()> {
    if args.verbose {
        println!("Starting TODO scan of: {}", args.repo_path.display());
        println!("Dry run: {}", args.dry_run);
    }

    let config =
        config::load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let rules =
        ScanConfig::from_config(&config, &args.ignore.ignore_dirs, &args.ignore.ignore_patterns)?;

    let todos =
        scanner::scan_directory(&args.repo_path, &rules).context("Failed to scan directory")?;

    if todos.is_empty() {
        println!("No TODOs found in the repository.");
        // Issues for the last removed TODOs still need closing
        if !args.close_resolved {
            return Ok(());
        }
    } else {
        let summary = scanner::summarize(&todos);
        println!("\nScan Summary:");
        for line in reporter::format_summary(&summary).lines() {
            println!("  {}", line);
        }

        if args.verbose {
            println!("\nTODOs by file:");
            for (path, count) in &summary.files {
                println!("  {}: {}", path.display(), count);
            }
        }
    }

    let repo_name = match args.repo_name {
        Some(name) => name,
        None => match git::remote_repo_slug(&args.repo_path) {
            Some(name) => name,
            None => bail!(
                "No repository given: pass --repo-name, set GITHUB_REPOSITORY, or add an origin remote"
            ),
        },
    };

    if args.verbose {
        println!("\nConnecting to GitHub repository: {}", repo_name);
    }

    let timeout = config.tracker.request_timeout()?;
    let client = GitHubClient::new(&args.github_token, &repo_name, &config.tracker, timeout)
        .context("Failed to create GitHub client")?;
    let reconciler = Reconciler::connect(client, config.tracker.label.as_str(), args.dry_run)
        .with_context(|| format!("Failed to connect to {}", repo_name))?;

    if args.verbose {
        let repo = reconciler.repository();
        println!("Connected to: {}", repo.full_name);
        println!("Default branch: {}", repo.default_branch);
        println!("\nCreating GitHub issues...");
    }

    let outcome = reconciler.reconcile(&todos, args.dry_run);

    if args.dry_run {
        for draft in &outcome.planned {
            println!("[DRY RUN] Would create issue: {}", draft.title);
        }
        println!("\n[DRY RUN] Would create {} new issues", outcome.planned.len());
        println!("[DRY RUN] Would skip {} existing TODOs", outcome.skipped.len());

        if args.close_resolved {
            let resolved = reconciler.find_resolved(&todos);
            println!("[DRY RUN] Would close {} resolved TODO issues", resolved.len());
        }
    } else {
        println!("\nCreated {} new issues", outcome.created.len());
        println!("Skipped {} existing TODOs", outcome.skipped.len());

        if args.verbose && !outcome.created.is_empty() {
            println!("\nCreated issues:");
            for issue in &outcome.created {
                println!("  #{}: {}", issue.number, issue.title);
                println!("    URL: {}", issue.html_url);
            }
        }

        if args.close_resolved {
            if args.verbose {
                println!("\nChecking for resolved TODOs...");
            }

            let closed = reconciler.close_resolved(&todos);
            if closed.is_empty() {
                println!("No resolved TODOs to close");
            } else {
                println!("Closed {} resolved TODO issues", closed.len());
                if args.verbose {
                    for issue in &closed {
                        println!("  #{}: {}", issue.number, issue.title);
                    }
                }
            }
        }
    }

    println!("\nTODO tracking completed successfully!");
    Ok(())
}

fn scan_command(args: cli::ScanArgs) -> Result<()> {
    let config =
        config::load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let rules =
        ScanConfig::from_config(&config, &args.ignore.ignore_dirs, &args.ignore.ignore_patterns)?;

    tracing::info!("Scanning: {}", args.path.display());

    let todos =
        scanner::scan_directory(&args.path, &rules).context("Failed to scan directory")?;

    if todos.is_empty() && matches!(args.format, cli::OutputFormat::Terminal) {
        println!("No TODOs found in the repository.");
        return Ok(());
    }

    let report = ScanReport::new(todos, args.path.clone());
    reporter::generate_report(&report, args.format, args.output.as_deref())
        .context("Failed to generate report")?;

    Ok(())
}

fn init_config_command(args: cli::InitConfigArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    config::save_config(&Config::default(), &args.path)?;
    println!("Wrote default configuration to {}", args.path.display());
    Ok(())
}
