use std::io::{self, IsTerminal};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::render::{search_json, write_search_results, write_skipped};
use crate::config::{Settings, SettingsOverrides};
use crate::history::query_history;
use crate::models::{HistoryQuery, PruneOutcome, SearchOptions, TimeRange};
use crate::retention::{PruneTarget, prune_targets};
use crate::search::{TextQuery, search_documents};
use crate::utils::{Workspace, parse_timestamp, resolve_workspace_root};

#[derive(Parser)]
#[command(name = "workbench-ops")]
#[command(version = "0.1.0")]
#[command(about = "Prune old run archives and query research notes", long_about = None)]
pub struct Cli {
    /// Workspace root holding state/ and research/ [default: $WORKBENCH_ROOT or current directory]
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Delete old run archives (state/runs) and deployment records (state/cd)
    Gc(GcArgs),
    /// Search research documents for lines containing a query
    Search(SearchArgs),
    /// Query *.history.json entries by feature and time window
    History(HistoryArgs),
}

#[derive(Args)]
pub struct GcArgs {
    /// Number of most recent entries eligible for retention [env: KEEP_RUNS, default: 5]
    #[arg(long, value_name = "N")]
    pub keep_runs: Option<usize>,

    /// Maximum age in days of retained, non-promoted entries [env: KEEP_DAYS, default: 30]
    #[arg(long, value_name = "DAYS")]
    pub keep_days: Option<u64>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Query terms, joined with spaces (quote to keep them together)
    #[arg(required = true, value_name = "QUERY")]
    pub terms: Vec<String>,

    /// Matching lines shown per file [env: RESEARCH_SNIPPET_LIMIT, default: 3]
    #[arg(short, long, value_name = "N")]
    pub limit: Option<NonZeroUsize>,

    /// Match case exactly
    #[arg(long = "case-sensitive", visible_alias = "cs")]
    pub case_sensitive: bool,

    /// Print one JSON document with every match
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Only entries for this feature slug
    #[arg(short, long, value_name = "SLUG")]
    pub feature: Option<String>,

    /// Only entries valid at this instant (ISO-8601)
    #[arg(long, value_name = "TIMESTAMP", value_parser = parse_timestamp_arg)]
    pub on: Option<DateTime<Utc>>,

    /// Only entries captured at or after this instant (ISO-8601)
    #[arg(long, value_name = "TIMESTAMP", value_parser = parse_timestamp_arg)]
    pub from: Option<DateTime<Utc>>,

    /// Only entries captured at or before this instant (ISO-8601)
    #[arg(long, value_name = "TIMESTAMP", value_parser = parse_timestamp_arg)]
    pub to: Option<DateTime<Utc>>,
}

fn parse_timestamp_arg(value: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(value)
        .ok_or_else(|| format!("expected an ISO-8601 date or timestamp, got {:?}", value))
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .finish();
    // Only fails if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Parse arguments, run the command and map the result to an exit code
///
/// Usage errors exit 1; `--help` and `--version` exit 0.
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    init_logging(cli.verbose);

    match execute(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

pub fn execute(cli: Cli) -> Result<ExitCode> {
    let workspace = Workspace::new(resolve_workspace_root(cli.root.as_deref())?);

    match cli.command {
        Commands::Gc(args) => run_gc(&workspace, &args),
        Commands::Search(args) => run_search(&workspace, &args),
        Commands::History(args) => run_history(&workspace, args),
    }
}

fn run_gc(workspace: &Workspace, args: &GcArgs) -> Result<ExitCode> {
    let settings = Settings::from_env(SettingsOverrides {
        keep_runs: args.keep_runs,
        keep_days: args.keep_days,
        ..SettingsOverrides::default()
    });
    let policy = settings.retention_policy();
    let now = Utc::now();

    let targets = PruneTarget::workspace_defaults(workspace);
    let outcomes = prune_targets(&targets, &policy, now)?;
    for path in outcomes.iter().flat_map(|outcome| &outcome.removed) {
        println!("Removed {}", path.display());
    }
    outcomes.iter().try_for_each(PruneOutcome::ensure_complete)?;

    Ok(ExitCode::SUCCESS)
}

fn run_search(workspace: &Workspace, args: &SearchArgs) -> Result<ExitCode> {
    let query_text = args.terms.join(" ").trim().to_string();
    if query_text.is_empty() {
        bail!("Query must not be empty (see --help)");
    }

    let settings = Settings::from_env(SettingsOverrides {
        snippet_limit: args.limit.map(NonZeroUsize::get),
        ..SettingsOverrides::default()
    });
    let options = SearchOptions {
        limit: settings.snippet_limit,
        case_sensitive: args.case_sensitive,
        json: args.json,
    };

    let docs_root = workspace.research_dir();
    let query = TextQuery::new(&query_text, options.case_sensitive);
    let report = search_documents(&docs_root, workspace, &query, settings.max_file_bytes)?;

    if report.files_seen == 0 {
        eprintln!("No research documents found under {}", workspace.relative(&docs_root));
        return Ok(ExitCode::FAILURE);
    }

    if options.json {
        println!("{}", search_json(&query_text, &options, &report)?);
    } else {
        if report.has_matches() {
            write_search_results(&mut io::stdout().lock(), &report, options.limit)?;
        } else {
            eprintln!("No matches for \"{}\" in {}", query_text, workspace.relative(&docs_root));
        }
        write_skipped(&mut io::stderr().lock(), &report)?;
    }

    Ok(if report.has_matches() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn run_history(workspace: &Workspace, args: HistoryArgs) -> Result<ExitCode> {
    let query = HistoryQuery {
        feature: args.feature,
        on: args.on,
        range: TimeRange { from: args.from, to: args.to },
    };

    let matches = query_history(&workspace.research_dir(), workspace, &query)?;
    let entries: Vec<Value> = matches.into_iter().map(|m| m.entry).collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);

    Ok(ExitCode::SUCCESS)
}
