//! ratetap CLI - exchange-rate sync from exchangerate.host.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "ratetap")]
#[command(about = "Sync exchange rates from exchangerate.host", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync exchange rates from the start date (or bookmark) up to today
    #[command(
        after_help = "The auth token can also be supplied with the RATETAP_AUTH_TOKEN environment variable."
    )]
    Sync {
        /// Path to the JSON config file
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the state file. Defaults to the platform data directory.
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Neither read nor write a state file
        #[arg(long, conflicts_with = "state")]
        no_state: bool,

        /// Override the configured start date (YYYY-MM-DD). A stored bookmark takes precedence.
        #[arg(long)]
        start_date: Option<String>,

        /// Override the configured source currency (e.g., USD)
        #[arg(long)]
        source_currency: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "singer")]
        format: Format,

        /// Output file path. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the request windows a sync from START would use
    Windows {
        /// Start date (YYYY-MM-DD)
        start: String,
    },

    /// Inspect or clear the sync bookmark
    State {
        #[command(subcommand)]
        action: StateAction,
    },
}

/// Actions on the state file.
#[derive(Subcommand)]
enum StateAction {
    /// Print the stored state
    Show {
        /// Path to the state file. Defaults to the platform data directory.
        #[arg(short, long)]
        state: Option<PathBuf>,
    },

    /// Delete the stored state so the next sync starts from the configured date
    Reset {
        /// Path to the state file. Defaults to the platform data directory.
        #[arg(short, long)]
        state: Option<PathBuf>,
    },
}

/// Installs the stderr log subscriber; stdout is reserved for records.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Sync {
            config,
            state,
            no_state,
            start_date,
            source_currency,
            format,
            output,
        } => {
            let args = commands::sync::SyncArgs {
                config,
                state,
                no_state,
                start_date,
                source_currency,
                format,
                output,
            };
            commands::sync::sync(args, cli.quiet).await
        }
        Commands::Windows { start } => commands::windows::show_windows(&start),
        Commands::State { action } => match action {
            StateAction::Show { state } => commands::state::show_state(state),
            StateAction::Reset { state } => commands::state::reset_state(state),
        },
    }
}
