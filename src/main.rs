//! merge-probe CLI

mod cli;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cli::context::{CommandContext, ContextOptions};
use cli::probe::{ProbeOptions, confirm_probe, run_probe};
use cli::report::print_conclusions;
use cli::style::Stylize;
use cli::survey::run_survey;
use merge_probe::probe::{PollSettings, ProbeSettings};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "merge-probe")]
#[command(about = "Diagnose why pull requests fail to merge automatically")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args)]
struct GlobalArgs {
    /// Path inside the repository
    #[arg(short, long, global = true, default_value = ".")]
    path: PathBuf,

    /// Git remote to push the test branch to
    #[arg(long, global = true, default_value = "origin")]
    remote: String,

    /// Trunk branch to cut from and merge into
    #[arg(long, global = true, default_value = "main")]
    trunk: String,

    /// Token file (default: ~/.GITHUB_TOKEN)
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    /// GitHub API base URL (default: derived from the remote host)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Mergeability checks before giving up
    #[arg(long, global = true, default_value_t = 5)]
    max_attempts: u32,

    /// Seconds between mergeability checks
    #[arg(long, global = true, default_value_t = 3)]
    backoff_secs: u64,

    /// Seconds to wait after opening the PR before the first check
    #[arg(long, global = true, default_value_t = 2)]
    settle_secs: u64,

    /// Do not ask for confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl GlobalArgs {
    fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            trunk: self.trunk.clone(),
            remote: self.remote.clone(),
            settle_delay: Duration::from_secs(self.settle_secs),
            poll: PollSettings {
                max_attempts: self.max_attempts,
                backoff: Duration::from_secs(self.backoff_secs),
            },
            ..ProbeSettings::default()
        }
    }

    fn context_options(&self) -> ContextOptions<'_> {
        ContextOptions {
            path: &self.path,
            token_file: self.token_file.as_deref(),
            api_url: self.api_url.as_deref(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the merge mechanism, survey open PRs, and print conclusions (default)
    Run,

    /// Only push a conflict-free test PR through the merge path
    Probe,

    /// Only list open PRs with merge conflicts (read-only)
    Survey,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let ctx = CommandContext::new(&cli.global.context_options(), cli.global.probe_settings())?;
    let options = ProbeOptions {
        yes: cli.global.yes,
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            if !confirm_probe(&ctx, options)? {
                return Ok(());
            }
            let probe = run_probe(&ctx).await;
            let survey = match run_survey(&ctx).await {
                Ok(survey) => Some(survey),
                Err(e) => {
                    anstream::println!("{}", format!("⚠️  Survey failed: {e}").warn());
                    None
                }
            };
            print_conclusions(Some(&probe), survey.as_ref());
        }
        Commands::Probe => {
            if !confirm_probe(&ctx, options)? {
                return Ok(());
            }
            let probe = run_probe(&ctx).await;
            print_conclusions(Some(&probe), None);
        }
        Commands::Survey => {
            let survey = run_survey(&ctx).await?;
            print_conclusions(None, Some(&survey));
        }
    }

    Ok(())
}
