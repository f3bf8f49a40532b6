//! # Fondo Server
//!
//! Main entry point for the Fondo fund subscription ledger.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! fondo-server
//!
//! # Run with custom configuration file
//! fondo-server --config /path/to/config.yaml
//!
//! # Run with environment variable overrides
//! FONDO_SERVER_PORT=9090 FONDO_LEDGER_INITIAL_BALANCE=1000000 fondo-server
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use fondo_core::config::Validatable;
use fondo_server::{FondoServer, ServiceConfig};

/// Fondo subscription ledger server
#[derive(Parser, Debug)]
#[command(name = "fondo-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override server host
    #[arg(long, env = "FONDO_SERVER_HOST")]
    host: Option<String>,

    /// Override server port
    #[arg(long, env = "FONDO_SERVER_PORT")]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if args.validate {
        println!("Configuration is valid");
        return;
    }

    match run_server(config).await {
        Ok(()) => {
            info!("Fondo server stopped");
        }
        Err(e) => {
            error!(error = %e, "Server error");
            std::process::exit(1);
        }
    }
}

/// Loads configuration from file and applies command-line overrides.
fn load_config(args: &Args) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
    let mut config = if args.config.exists() {
        FondoServer::load_config(&args.config)?
    } else {
        eprintln!(
            "Configuration file not found: {}, using defaults",
            args.config.display()
        );
        FondoServer::default_config()?
    };

    if let Some(host) = &args.host {
        config.fondo.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.fondo.server.port = port;
    }
    if args.debug {
        config.fondo.logging.level = "debug".to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Creates and runs the server.
async fn run_server(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut server = FondoServer::new(config);

    server.initialize().await?;

    // blocks until shutdown
    server.run().await?;

    Ok(())
}
