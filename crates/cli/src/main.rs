//! `ThreadPress` CLI - Offline pricing tools for operators.
//!
//! # Usage
//!
//! ```bash
//! # Price a cart offline against a charge plan
//! tp-cli quote -c cart.yaml -p plan.yaml
//!
//! # Apply a location markup percentage on top
//! tp-cli quote -c cart.yaml -p plan.yaml --location-percentage 15
//!
//! # Check a charge plan's tier invariants
//! tp-cli validate-plan -p plan.yaml
//! ```
//!
//! # Commands
//!
//! - `quote` - Price a cart from YAML files, no network
//! - `validate-plan` - Check a charge plan for broken tier ranges
//!
//! Unlike the storefront quote, the offline total here folds packaging &
//! forwarding and printing charges into the amount shown, so operators
//! see the full cost of fulfilling an order.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "tp-cli")]
#[command(author, version, about = "ThreadPress CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a cart offline against a charge plan
    Quote {
        /// Cart YAML file (a list of cart lines)
        #[arg(short, long)]
        cart: PathBuf,

        /// Charge plan YAML file
        #[arg(short, long)]
        plan: PathBuf,

        /// Location markup percent applied after GST (default: none)
        #[arg(long, value_parser = parse_decimal)]
        location_percentage: Option<Decimal>,
    },
    /// Check a charge plan's tier invariants
    ValidatePlan {
        /// Charge plan YAML file
        #[arg(short, long)]
        plan: PathBuf,
    },
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw).map_err(|e| e.to_string())
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Quote {
            cart,
            plan,
            location_percentage,
        } => commands::quote::run(&cart, &plan, location_percentage)?,
        Commands::ValidatePlan { plan } => commands::validate::run(&plan)?,
    }
    Ok(())
}
