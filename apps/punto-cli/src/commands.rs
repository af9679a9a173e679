//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use punto_client::repository::{
    Companies, Customers, Employees, Headquarters, Products, SaleDetails, Sales, Suppliers, Taxes,
};
use punto_client::{Backend, ClientConfig, ClientError, Repository, Resource, Session};
use punto_core::cart::{priced_lines, unresolved_lines};
use punto_core::listing::{filter_inventories, filter_records, paginate, Searchable};
use punto_core::{compute_totals, Cart, Catalog, CustomerId, PaymentMethod, SaleLine};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::cli::Entity;
use crate::output::{render_page, render_totals, Row};

/// Everything a subcommand needs from the outside.
pub struct App {
    pub config: ClientConfig,
    pub backend: Backend,
}

impl App {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config = ClientConfig::load(config_path).context("loading configuration")?;
        let backend = Backend::new(&config).context("building the HTTP client")?;
        Ok(App { config, backend })
    }
}

fn session_from(token: &str) -> Result<Session> {
    let session = Session::from_token(token).context("reading the bearer token")?;
    if session.is_expired() {
        warn!("Token has expired; requests will likely be refused");
    }
    Ok(session)
}

/// Points the user back to `punto login` when the service refused the token.
fn relogin_hint(err: ClientError) -> anyhow::Error {
    if err.is_auth_error() {
        anyhow::Error::new(err).context("the service refused the token; run `punto login` again")
    } else {
        err.into()
    }
}

fn build_cart(lines: &[SaleLine]) -> Result<Cart> {
    let mut cart = Cart::new();
    for line in lines {
        cart.add_line(*line)?;
    }
    Ok(cart)
}

// =============================================================================
// login
// =============================================================================

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let session = app.backend.login(email, password).await?;
    println!("{}", session.token());
    Ok(())
}

// =============================================================================
// list
// =============================================================================

pub async fn list(
    app: &App,
    token: &str,
    entity: Entity,
    search: Option<&str>,
    page: usize,
) -> Result<()> {
    let session = session_from(token)?;
    let term = search.unwrap_or_default();

    let text = match entity {
        Entity::Products => list_page::<Products>(app, &session, term, page).await?,
        Entity::Taxes => list_page::<Taxes>(app, &session, term, page).await?,
        Entity::Customers => list_page::<Customers>(app, &session, term, page).await?,
        Entity::Employees => list_page::<Employees>(app, &session, term, page).await?,
        Entity::Suppliers => list_page::<Suppliers>(app, &session, term, page).await?,
        Entity::Companies => list_page::<Companies>(app, &session, term, page).await?,
        Entity::Headquarters => list_page::<Headquarters>(app, &session, term, page).await?,
        Entity::Sales => list_page::<Sales>(app, &session, term, page).await?,
        Entity::SaleDetails => list_page::<SaleDetails>(app, &session, term, page).await?,
        Entity::Inventory => {
            let inventories = app.backend.inventory(&session).list().await.map_err(relogin_hint)?;
            let filtered = filter_inventories(&inventories, term);
            let page = paginate(filtered, page, app.config.display.items_per_page);
            render_page(&page, &app.config.display.currency_format())
        }
    };

    println!("{}", text);
    Ok(())
}

async fn list_page<R>(app: &App, session: &Session, term: &str, page: usize) -> Result<String>
where
    R: Resource,
    R::Record: Searchable + Row,
{
    let records = app
        .backend
        .repository::<R>(session)
        .list()
        .await
        .map_err(relogin_hint)?;
    let filtered = filter_records(&records, term);
    let page = paginate(filtered, page, app.config.display.items_per_page);
    Ok(render_page(&page, &app.config.display.currency_format()))
}

// =============================================================================
// totals
// =============================================================================

async fn priced_cart(app: &App, session: &Session, lines: &[SaleLine]) -> Result<(Cart, Catalog)> {
    let cart = build_cart(lines)?;
    let catalog = app.backend.catalog(session).await.map_err(relogin_hint)?;

    for index in unresolved_lines(&cart, &catalog) {
        let line = cart.lines()[index];
        warn!(
            line = index + 1,
            product_id = ?line.product_id,
            quantity = line.quantity,
            "Line does not price and is left out of the totals"
        );
    }
    Ok((cart, catalog))
}

pub async fn totals(app: &App, token: &str, lines: &[SaleLine]) -> Result<()> {
    let session = session_from(token)?;
    let (cart, catalog) = priced_cart(app, &session, lines).await?;

    let breakdown: Vec<_> = priced_lines(&cart, &catalog).collect();
    let totals = compute_totals(&cart, &catalog);
    println!(
        "{}",
        render_totals(&breakdown, &totals, &app.config.display.currency_format())
    );
    Ok(())
}

// =============================================================================
// checkout
// =============================================================================

pub async fn checkout(
    app: &App,
    token: &str,
    lines: &[SaleLine],
    payment: PaymentMethod,
    customer: Option<CustomerId>,
) -> Result<()> {
    let session = session_from(token)?;
    let (cart, catalog) = priced_cart(app, &session, lines).await?;

    let receipt = app
        .backend
        .checkout(&session)
        .submit(&cart, &catalog, payment, customer)
        .await
        .map_err(relogin_hint)
        .context("recording the sale")?;

    info!(sale_id = receipt.sale.id, details = receipt.details.len(), "Checkout complete");

    let money = app.config.display.currency_format();
    let breakdown: Vec<_> = priced_lines(&cart, &catalog).collect();
    println!("Sale {} recorded ({})", receipt.sale.id, receipt.sale.payment_method);
    println!("{}", render_totals(&breakdown, &receipt.totals, &money));
    Ok(())
}

// =============================================================================
// config
// =============================================================================

pub fn show_config(config_path: Option<PathBuf>, init: bool) -> Result<()> {
    let config = ClientConfig::load(config_path.clone()).context("loading configuration")?;
    print!("{}", toml::to_string_pretty(&config)?);

    if init {
        let Some(path) = config_path.or_else(ClientConfig::default_config_path) else {
            bail!("no config directory available on this platform");
        };
        config.save(Some(path.clone()))?;
        info!(?path, "Config written");
    }
    Ok(())
}
