use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use postflight::models::config::DEFAULT_CONFIG_PATH;
use postflight::{HookConfig, Result};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "postflight")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Post-run hook for the endpoint-management agent", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Also write log records to stderr, at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip the root check (diagnostics only)
    #[arg(long, global = true, hide = true)]
    no_root_check: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile, notify and persist counters (default)
    Run {
        /// Print the run summary as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show persisted counters, trigger state and current pending counts
    Status {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Zero the pending counters and remove the logout trigger
    Reset,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    if let Err(e) = runtime.block_on(run_async(cli)) {
        tracing::error!(error = %format!("{:#}", e), "Run aborted");
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Run { json: false });

    if let Commands::Completions { shell } = command {
        generate(shell, &mut Cli::command(), "postflight", &mut io::stdout());
        return Ok(());
    }

    let config = HookConfig::load(&cli.config)?;

    if let Err(e) = postflight::utils::logging::init(&config.log_path, cli.verbose) {
        // Logging is not worth aborting the run for
        eprintln!("{}", format!("⚠ {:#}", e).yellow());
    }

    match command {
        Commands::Run { json } => {
            postflight::cli::run::run(&config, cli.no_root_check, json).await?;
        }

        Commands::Status { json } => {
            postflight::cli::status::run(&config, json)?;
        }

        Commands::Reset => {
            postflight::cli::reset::run(&config, cli.no_root_check)?;
        }

        Commands::Completions { .. } => unreachable!("handled before config is loaded"),
    }

    Ok(())
}
