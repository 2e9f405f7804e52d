//! Duo-Connecte CLI
//!
//! Command-line interface for Duo-Connecte: inspect the guided flows, manage
//! the local mode flag and check host identity messages.

mod commands;
mod config;
mod display;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use duo_core::session::FlowKind;

use config::CliConfig;

fn parse_flow(value: &str) -> Result<FlowKind, String> {
    FlowKind::parse(value).ok_or_else(|| format!("unknown flow '{}' (use solo or duo)", value))
}

#[derive(Parser)]
#[command(name = "duo")]
#[command(version, about = "Guided conversations for one or two people")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory (default: platform data dir)
    #[arg(long, global = true, env = "DUO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Origin of the embedding host
    #[arg(long, global = true, env = "DUO_EXPECTED_ORIGIN")]
    expected_origin: Option<String>,

    /// Backend base URL
    #[arg(long, global = true, env = "DUO_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change the app mode
    #[command(subcommand)]
    Mode(ModeCommands),

    /// List the steps of a flow
    Steps {
        /// Flow to list (solo or duo)
        #[arg(long, default_value = "duo", value_parser = parse_flow)]
        flow: FlowKind,
    },

    /// Walk through a flow interactively
    Walk {
        /// Flow to run (asked if omitted)
        #[arg(long, value_parser = parse_flow)]
        flow: Option<FlowKind>,
    },

    /// Show or set participant names
    Names {
        /// Participant A (speaks first)
        #[arg(requires = "b")]
        a: Option<String>,
        /// Participant B (listens first)
        b: Option<String>,
    },

    /// Check a recorded host identity message
    CheckMessage {
        /// Expected host origin (overrides --expected-origin)
        #[arg(long)]
        origin: Option<String>,

        /// Origin the message was posted from
        #[arg(long)]
        from: String,

        /// JSON file with the message payload
        file: PathBuf,
    },

    /// Sign in with a member PIN
    Login {
        /// Member PIN
        pin: String,
    },

    /// Show the signed-in member
    Whoami,

    /// Remove stored credentials
    Logout,

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ModeCommands {
    /// Print the current mode
    Show,

    /// Switch mode (development or production)
    Set {
        /// Target mode
        mode: String,
    },
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("duo=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        display::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_logging()?;

    // Resolve data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("duo-connecte")
    });

    let config = CliConfig {
        data_dir,
        expected_origin: cli.expected_origin,
        api_url: cli.api_url,
    };

    match cli.command {
        Commands::Mode(cmd) => match cmd {
            ModeCommands::Show => commands::mode::show(&config)?,
            ModeCommands::Set { mode } => commands::mode::set(&config, &mode)?,
        },
        Commands::Steps { flow } => commands::steps::run(flow),
        Commands::Walk { flow } => commands::walk::run(&config, flow)?,
        Commands::Names { a, b } => match (a, b) {
            (Some(a), Some(b)) => commands::names::set(&config, &a, &b)?,
            _ => commands::names::show(&config)?,
        },
        Commands::CheckMessage { origin, from, file } => {
            commands::check::run(&config, origin.as_deref(), &from, &file)?;
        }
        Commands::Login { pin } => commands::account::login(&config, &pin).await?,
        Commands::Whoami => commands::account::whoami(&config).await?,
        Commands::Logout => commands::account::logout(&config)?,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "duo", &mut io::stdout());
        }
    }

    Ok(())
}
