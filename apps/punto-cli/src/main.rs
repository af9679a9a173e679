//! # punto
//!
//! Command-line front end for the Punto back office.
//!
//! ```text
//! punto login --email E --password P          # prints the bearer token
//! punto list products --search cafe --page 2  # needs --token or PUNTO_TOKEN
//! punto totals --line 1:3 --line 4:1
//! punto checkout --line 1:3 --payment cash --customer 9
//! punto config [--init]
//! ```
//!
//! Any error exits non-zero with its cause chain on stderr.

mod cli;
mod commands;
mod output;

use cli::{CommandLine, Commands};
use clap::Parser;
use commands::App;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse();
    init_tracing();

    match cli.command {
        Commands::Config { init } => commands::show_config(cli.config, init),
        Commands::Login { email, password } => {
            let app = App::load(cli.config)?;
            commands::login(&app, &email, &password).await
        }
        Commands::List {
            entity,
            auth,
            search,
            page,
        } => {
            let app = App::load(cli.config)?;
            commands::list(&app, &auth.token, entity, search.as_deref(), page).await
        }
        Commands::Totals { auth, lines } => {
            let app = App::load(cli.config)?;
            commands::totals(&app, &auth.token, &lines.lines).await
        }
        Commands::Checkout {
            auth,
            lines,
            payment,
            customer,
        } => {
            let app = App::load(cli.config)?;
            commands::checkout(&app, &auth.token, &lines.lines, payment, customer).await
        }
    }
}

/// Logs go to stderr so stdout stays clean for tokens and tables.
///
/// `RUST_LOG` overrides the default `info,punto=debug`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,punto=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
