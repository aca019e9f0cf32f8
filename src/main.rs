//! homevpn - home VPN and network share manager
//!
//! A command-line front end for the HomeVPN core: connect and disconnect the
//! VPN, mount and unmount the share, and watch status changes live.

use clap::{Parser, Subcommand};
use homevpn_core::{error::HomeVpnError, init_logging};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "homevpn")]
#[command(about = "Manage a home VPN connection and its network share")]
struct Cli {
    /// Configuration file (default: $HOMEVPN_CONFIG or ~/.homeVPN)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check and show VPN and share status
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Connect to the VPN
    Connect,
    /// Disconnect from the VPN
    Disconnect,
    /// Mount the network share (requires the VPN)
    Mount,
    /// Unmount the network share
    Unmount,
    /// Watch status continuously until Ctrl+C
    Monitor,
    /// Inspect or write the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Print the configuration as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the effective configuration to the config file
    Save,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Status { json } => cli::vpn::run_status(config_path, json).await,
        Commands::Connect => cli::vpn::run_connect(config_path).await,
        Commands::Disconnect => cli::vpn::run_disconnect(config_path).await,
        Commands::Mount => cli::share::run_mount(config_path).await,
        Commands::Unmount => cli::share::run_unmount(config_path).await,
        Commands::Monitor => cli::monitor::run_monitor(config_path).await,
        Commands::Config { action } => match action {
            ConfigCommands::Show { json } => cli::config::run_show(config_path, json),
            ConfigCommands::Save => cli::config::run_save(config_path),
            ConfigCommands::Path => cli::config::run_path(config_path),
        },
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let exit_code = match e {
                // Configuration errors (exit code 2)
                HomeVpnError::Config(_) => 2,
                // Runtime failures (exit code 1)
                HomeVpnError::Rejected(_)
                | HomeVpnError::Command(_)
                | HomeVpnError::Probe(_)
                | HomeVpnError::Io(_) => 1,
            };

            eprintln!("{}", e);
            std::process::exit(exit_code);
        }
    }
}
