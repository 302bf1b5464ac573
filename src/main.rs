//! Permalinker - permanent links to source lines on git hosting services

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, CommandFactory, Parser, Subcommand};
use permalinker::config::{Config, Overrides};
use permalinker::git::CliGit;
use permalinker::{
    Candidate, LinkKind, RepositoryType, Request, SelectedLines, browser,
    build_permalink_candidates, paths,
};
use tracing::info;

/// Print permalinks for a file in a git checkout
#[derive(Parser)]
#[command(name = "permalinker")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_negates_reqs = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    link: LinkArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// Print the config file path instead
    #[arg(long, conflicts_with = "init")]
    path: bool,

    /// Write a config file with the default settings
    #[arg(long)]
    init: bool,

    /// Overwrite an existing config file with --init
    #[arg(long, requires = "init")]
    force: bool,
}

#[derive(Args)]
struct LinkArgs {
    /// File to link to
    #[arg(required = true)]
    file: Option<PathBuf>,

    /// Line or line range, e.g. 10 or 10-15
    #[arg(short, long, value_name = "N|N-M")]
    lines: Option<SelectedLines>,

    /// Page to link to
    #[arg(short, long, default_value = "file", value_parser = parse_link_kind)]
    kind: LinkKind,

    /// Hosting provider layout [possible values: auto, github, bitbucket, bitbucket-server]
    #[arg(long, value_parser = parse_repository_type)]
    repository_type: Option<RepositoryType>,

    /// Branch that is always offered when pushed
    #[arg(long, value_name = "BRANCH")]
    default_branch: Option<String>,

    /// Remote consulted when only the default branch is relevant
    #[arg(long, value_name = "REMOTE")]
    default_remote: Option<String>,

    /// Maximum size of the branch listing in bytes
    #[arg(long, value_name = "BYTES")]
    max_buffer: Option<usize>,

    /// Do not offer a link pinned to the current commit
    #[arg(long)]
    exclude_current_revision: bool,

    /// Ignore git directory overrides from the environment
    #[arg(long)]
    unset_git_dir: bool,

    /// Print candidates as a JSON array
    #[arg(long)]
    json: bool,

    /// Open a candidate in the browser, e.g. --open=2 (the index may be omitted when there is only one)
    #[arg(
        short,
        long,
        value_name = "INDEX",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "0"
    )]
    open: Option<usize>,
}

impl LinkArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            repository_type: self.repository_type,
            default_branch: self.default_branch.clone(),
            default_remote: self.default_remote.clone(),
            max_buffer: self.max_buffer,
            exclude_current_revision: self.exclude_current_revision,
            unset_git_dir: self.unset_git_dir,
            browser: None,
        }
    }
}

fn parse_link_kind(value: &str) -> Result<LinkKind, String> {
    LinkKind::ALL
        .iter()
        .copied()
        .find(|kind| kind.command_name().eq_ignore_ascii_case(value))
        .ok_or_else(|| format!("unknown kind '{value}' (expected file, blame or history)"))
}

fn parse_repository_type(value: &str) -> Result<RepositoryType, String> {
    RepositoryType::ALL
        .iter()
        .copied()
        .find(|repository_type| repository_type.label() == value)
        .ok_or_else(|| {
            let expected: Vec<&str> = RepositoryType::ALL.iter().map(|t| t.label()).collect();
            format!(
                "unknown repository type '{value}' (expected one of {})",
                expected.join(", ")
            )
        })
}

fn main() -> Result<()> {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Let --help and --version exit normally
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                e.exit();
            }
            // For actual errors, show error + help
            eprintln!("error: {}\n", e.kind());
            Cli::command().print_help()?;
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Config(args)) => cmd_config(&args),
        None => cmd_link(&cli.link),
    }
}

/// Log to `permalinker.log` in the temp dir.
/// Set `PERMALINKER_DEBUG=0-3` to control verbosity (0=off, 1=warn, 2=info, 3=debug)
fn init_logging() {
    let debug_level = std::env::var("PERMALINKER_DEBUG")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(0);
    if debug_level == 0 {
        return;
    }

    let level = match debug_level {
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    let log_path = paths::log_path();
    let (Some(dir), Some(file_name)) = (log_path.parent(), log_path.file_name()) else {
        return;
    };
    // Clear the log file on startup
    if let Err(e) = std::fs::write(&log_path, "") {
        eprintln!("Warning: Failed to clear log file: {e}");
    }

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    tracing_subscriber::fmt()
        .with_writer(file_appender)
        .with_max_level(level)
        .with_ansi(false)
        .init();
}

fn cmd_config(args: &ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::default_path().display());
        return Ok(());
    }

    if args.init {
        let path = Config::default_path();
        if path.exists() && !args.force {
            bail!(
                "Config file already exists at {}; pass --force to overwrite it",
                path.display()
            );
        }
        Config::default().save_to(&path)?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = Config::load()?;
    let rendered = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{rendered}");
    Ok(())
}

fn cmd_link(args: &LinkArgs) -> Result<()> {
    let Some(file) = args.file.as_deref() else {
        bail!("No file given");
    };

    let config = Config::load()?.apply_overrides(args.overrides());
    let request = Request::for_file(file, args.lines, args.kind)?;
    let git = CliGit::new(config.unset_git_dir);
    let candidates = build_permalink_candidates(&git, &request, &config)?;

    if candidates.is_empty() {
        eprintln!(
            "No permalink available: no branch containing this file has been pushed to a remote"
        );
        return Ok(());
    }

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&candidates).context("Failed to serialize candidates")?;
        println!("{rendered}");
    } else {
        for (index, candidate) in candidates.iter().enumerate() {
            println!("{}", render_candidate(index + 1, candidate));
        }
    }

    if let Some(index) = args.open {
        let candidate = choose_candidate(&candidates, (index != 0).then_some(index))?;
        info!(url = %candidate.url, "Opening candidate");
        browser::open_url(&candidate.url, config.browser.as_deref())?;
    }
    Ok(())
}

fn render_candidate(index: usize, candidate: &Candidate) -> String {
    format!(
        "{index}. {}  {}  {}\n   {}",
        candidate.label, candidate.detail, candidate.description, candidate.url
    )
}

fn choose_candidate(candidates: &[Candidate], choice: Option<usize>) -> Result<&Candidate> {
    match (choice, candidates) {
        (None, [only]) => Ok(only),
        (None, _) => bail!(
            "{} candidates found; pass an index to --open",
            candidates.len()
        ),
        (Some(index), _) => index
            .checked_sub(1)
            .and_then(|i| candidates.get(i))
            .with_context(|| {
                format!(
                    "No candidate {index}; choose between 1 and {}",
                    candidates.len()
                )
            }),
    }
}
