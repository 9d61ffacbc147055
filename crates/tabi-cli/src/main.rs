//! # tabi-cli
//!
//! Command-line interface for the tabi ABI codec.
//!
//! ## Usage
//!
//! ```bash
//! # Values
//! tabi encode "address,uint256[]" '["0x8ba1f109551bd432803012645ac136ddd64dba72", [1, 2]]'
//! tabi decode "string" 0x0000...
//!
//! # Signatures
//! tabi parse "function balanceOf(address owner) view returns (uint256)"
//! tabi selector "transfer(address,uint256)"
//!
//! # Call data
//! tabi calldata encode --sig "transfer(address to, uint256 value)" '["0x...", 1000]'
//! tabi calldata decode --sig "transfer(address,uint256)" 0xa9059cbb...
//!
//! # Addresses
//! tabi address 0x8ba1f109551bd432803012645ac136ddd64dba72
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// tabi ABI codec CLI
#[derive(Parser, Debug)]
#[command(name = "tabi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Config file path (default: ~/.tabi/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Encode values for a comma-separated type list
    Encode(commands::codec::EncodeArgs),
    /// Decode hex data for a comma-separated type list
    Decode(commands::codec::DecodeArgs),
    /// Parse a function, constructor or event signature
    Parse(commands::signature::ParseArgs),
    /// Print the 4-byte selector of a function signature
    Selector(commands::signature::SelectorArgs),
    /// Show checksummed, ICAP and Tron forms of an address
    Address(commands::address::AddressArgs),
    /// Encode or decode contract call data
    #[command(subcommand)]
    Calldata(commands::calldata::CalldataCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set the default log level
        #[arg(long)]
        set_log_level: Option<String>,
        /// Present decoded call addresses in Tron form
        #[arg(long)]
        set_tron_addresses: Option<bool>,
        /// Hide error details
        #[arg(long)]
        set_censor_errors: Option<bool>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Load config
    let mut config = Config::load(cli.config.as_deref());

    // Initialize tracing
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::debug!(command = ?cli.command, "starting");

    let json = cli.json;
    let result = match cli.command {
        Commands::Encode(args) => args.execute(&config, json),
        Commands::Decode(args) => args.execute(&config, json),
        Commands::Parse(args) => args.execute(json),
        Commands::Selector(args) => args.execute(json),
        Commands::Address(args) => args.execute(json),
        Commands::Calldata(cmd) => cmd.execute(&config, json),
        Commands::Config {
            show,
            set_log_level,
            set_tron_addresses,
            set_censor_errors,
        } => handle_config(
            &mut config,
            cli.config.as_deref(),
            ConfigUpdate {
                log_level: set_log_level,
                tron_addresses: set_tron_addresses,
                censor_errors: set_censor_errors,
            },
            show,
            json,
        ),
    };

    if let Err(e) = result {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "code": e.code(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

struct ConfigUpdate {
    log_level: Option<String>,
    tron_addresses: Option<bool>,
    censor_errors: Option<bool>,
}

fn handle_config(
    config: &mut Config,
    path: Option<&std::path::Path>,
    update: ConfigUpdate,
    show: bool,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(level) = update.log_level {
        EnvFilter::try_new(&level)
            .map_err(|e| CliError::Config(format!("invalid log level {:?}: {}", level, e)))?;
        config.log_level = level;
        modified = true;
    }

    if let Some(tron) = update.tron_addresses {
        config.abi.tron_addresses = tron;
        modified = true;
    }

    if let Some(censor) = update.censor_errors {
        config.abi.censor_errors = censor;
        modified = true;
    }

    if modified {
        let saved = config.save(path)?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &saved.display().to_string())
            .message(&format!("Configuration saved to {}", saved.display()))
            .print();
    } else if show {
        Output::new(json)
            .field("log_level", &config.log_level)
            .field_value("abi", serde_json::to_value(&config.abi)?)
            .message(&format!(
                "Log level: {}\nCensor errors: {}\nCoerce small integers: {}\nTron addresses: {}",
                config.log_level,
                config.abi.censor_errors,
                config.abi.coerce_small_integers,
                config.abi.tron_addresses
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-log-level/--set-tron-addresses/--set-censor-errors to modify")
            .print();
    }

    Ok(())
}
