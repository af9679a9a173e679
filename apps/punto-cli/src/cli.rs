//! Command-line arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use punto_core::validation::{parse_quantity, validate_id};
use punto_core::{CustomerId, PaymentMethod, SaleLine};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "punto")]
#[command(about = "Back office for the Punto point of sale.", version)]
pub struct CommandLine {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, env = "PUNTO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and print the bearer token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List one page of an entity
    #[command(alias = "ls")]
    List {
        entity: Entity,
        #[command(flatten)]
        auth: TokenArg,
        /// Case-insensitive search term
        #[arg(long, short)]
        search: Option<String>,
        /// 1-based page number
        #[arg(long, short, default_value_t = 1)]
        page: usize,
    },
    /// Price a cart without recording it
    Totals {
        #[command(flatten)]
        auth: TokenArg,
        #[command(flatten)]
        lines: LineArgs,
    },
    /// Record a cart as a sale
    Checkout {
        #[command(flatten)]
        auth: TokenArg,
        #[command(flatten)]
        lines: LineArgs,
        /// cash, card, transfer or other
        #[arg(long)]
        payment: PaymentMethod,
        #[arg(long, value_parser = parse_customer)]
        customer: Option<CustomerId>,
    },
    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Args)]
pub struct TokenArg {
    /// Bearer token from `punto login`
    #[arg(long, env = "PUNTO_TOKEN", hide_env_values = true)]
    pub token: String,
}

#[derive(Debug, Args)]
pub struct LineArgs {
    /// PRODUCT_ID:QTY, repeatable
    #[arg(long = "line", short = 'l', required = true, value_parser = parse_line)]
    pub lines: Vec<SaleLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Products,
    Taxes,
    Customers,
    Employees,
    Suppliers,
    Companies,
    Headquarters,
    Sales,
    SaleDetails,
    Inventory,
}

/// Parses `PRODUCT_ID:QTY`.
pub fn parse_line(input: &str) -> Result<SaleLine, String> {
    let (id, qty) = input
        .split_once(':')
        .ok_or_else(|| format!("expected PRODUCT_ID:QTY, got '{}'", input))?;

    let product_id: i64 = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid product id '{}'", id.trim()))?;
    validate_id("productId", product_id).map_err(|e| e.to_string())?;

    let quantity = parse_quantity(qty).map_err(|e| e.to_string())?;
    Ok(SaleLine::new(product_id, quantity))
}

fn parse_customer(input: &str) -> Result<CustomerId, String> {
    let id: CustomerId = input
        .trim()
        .parse()
        .map_err(|_| format!("invalid customer id '{}'", input))?;
    validate_id("customerId", id).map_err(|e| e.to_string())?;
    Ok(id)
}
