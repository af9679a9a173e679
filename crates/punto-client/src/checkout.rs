//! # Checkout
//!
//! Turns a finished cart into a recorded sale.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  cart.check_submittable(catalog) ──► Err ──► nothing is created         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  compute_totals(cart, catalog)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sales.create(NewSale { saleDate, subtotalSale, totalTaxesSale,         │
//! │                         totalSale, paymentMethod, customerId? })        │
//! │       │ sale.id                                                         │
//! │       ▼                                                                 │
//! │  for each priced line:                                                  │
//! │      details.create(NewSaleDetail::from_line(line, sale.id))            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Receipt { sale, details, totals }                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service has no transaction spanning the sale and its details. When a
//! detail fails, the error is returned and the sale stays recorded with the
//! details created so far; the log names the sale.

use chrono::{DateTime, Utc};
use punto_core::cart::priced_lines;
use punto_core::drafts::{NewSale, NewSaleDetail};
use punto_core::{
    compute_totals, Cart, Catalog, CustomerId, PaymentMethod, Sale, SaleDetail, SaleTotals,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ClientResult;
use crate::repository::{Repository, SaleDetails, Sales};

/// What was recorded for a submitted cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub sale: Sale,
    pub details: Vec<SaleDetail>,
    pub totals: SaleTotals,
}

/// Submits carts through any pair of sale and sale-detail repositories.
#[derive(Debug, Clone)]
pub struct CheckoutService<S, D> {
    sales: S,
    details: D,
}

impl<S, D> CheckoutService<S, D>
where
    S: Repository<Sales>,
    D: Repository<SaleDetails>,
{
    pub fn new(sales: S, details: D) -> Self {
        CheckoutService { sales, details }
    }

    /// Records the cart as a sale dated now.
    pub async fn submit(
        &self,
        cart: &Cart,
        catalog: &Catalog,
        payment_method: PaymentMethod,
        customer_id: Option<CustomerId>,
    ) -> ClientResult<Receipt> {
        self.submit_at(cart, catalog, payment_method, customer_id, Utc::now())
            .await
    }

    /// Records the cart as a sale with the given date.
    pub async fn submit_at(
        &self,
        cart: &Cart,
        catalog: &Catalog,
        payment_method: PaymentMethod,
        customer_id: Option<CustomerId>,
        date: DateTime<Utc>,
    ) -> ClientResult<Receipt> {
        cart.check_submittable(catalog)?;

        let totals = compute_totals(cart, catalog);
        let draft = NewSale {
            date,
            subtotal: totals.subtotal(),
            tax_total: totals.tax_total(),
            total: totals.grand_total(),
            payment_method,
            customer_id,
        };

        let sale = self.sales.create(&draft).await?;
        info!(
            sale_id = sale.id,
            lines = cart.len(),
            total = %totals.grand_total(),
            %payment_method,
            "Created sale"
        );

        let mut details = Vec::with_capacity(cart.len());
        for line in priced_lines(cart, catalog) {
            let detail = NewSaleDetail::from_line(&line, sale.id);
            match self.details.create(&detail).await {
                Ok(created) => details.push(created),
                Err(e) => {
                    warn!(
                        sale_id = sale.id,
                        product_id = line.product_id,
                        recorded = details.len(),
                        error = %e,
                        "Sale detail failed; sale is incomplete"
                    );
                    return Err(e);
                }
            }
        }

        Ok(Receipt {
            sale,
            details,
            totals,
        })
    }
}
