use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use xrate::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount in the source currency
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Source currency code, e.g. USD
        #[arg(value_parser = parse_code)]
        from: String,
        /// Target currency code, e.g. JPY
        #[arg(value_parser = parse_code)]
        to: String,
    },
    /// Display the current rate table
    Rates,
    /// List known currencies, optionally filtered by code or name
    Currencies { query: Option<String> },
    /// Display rate cache freshness
    Status,
}

fn parse_code(value: &str) -> Result<String, String> {
    let code = value.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(format!("'{value}' is not a three-letter currency code"))
    }
}

impl From<Commands> for xrate::AppCommand {
    fn from(cmd: Commands) -> xrate::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => xrate::AppCommand::Convert { amount, from, to },
            Commands::Rates => xrate::AppCommand::Rates,
            Commands::Currencies { query } => xrate::AppCommand::Currencies { query },
            Commands::Status => xrate::AppCommand::Status,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

fn setup() -> Result<()> {
    let path = xrate::cli::setup::setup()?;
    println!("Created default configuration at {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(Commands::Convert { amount, .. }) if !amount.is_finite() => {
            Err(anyhow!("Amount must be a finite number"))
        }
        Some(cmd) => xrate::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
