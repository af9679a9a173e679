//! # Cart Aggregator
//!
//! The pending sale being assembled on the new-sale form, and the pure
//! computation of its totals.
//!
//! ## Aggregation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       compute_totals(cart, catalog)                     │
//! │                                                                         │
//! │  SaleLine { product_id, quantity }                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  catalog.get(product_id) ──── None / unselected / qty 0 ──► skipped    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  base = quantity × unit_price                                           │
//! │  tax  = Σ base.calculate_tax(rate)   one term per tax, not compounded   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LineTotals ──► SaleTotals { subtotal, tax_total, grand_total }         │
//! │                              grand_total = subtotal + tax_total         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `compute_totals` never fails. A line that cannot be priced contributes
//! zero; [`Cart::check_submittable`] is the gate that refuses such a cart
//! before a sale is created.
//!
//! ## Example
//! ```rust
//! use punto_core::cart::{compute_totals, Cart, Catalog, SaleLine};
//! use punto_core::money::Money;
//! use punto_core::types::{Product, Tax, TaxRate};
//!
//! let catalog = Catalog::from_products(vec![Product {
//!     id: 1,
//!     name: "Arroz".to_string(),
//!     description: None,
//!     unit_price: Money::from_major(1000),
//!     stock: 50,
//!     taxes: vec![Tax {
//!         id: 1,
//!         name: "IVA".to_string(),
//!         rate: TaxRate::from_percent(19),
//!         description: None,
//!     }],
//!     suppliers: vec![],
//! }]);
//!
//! let mut cart = Cart::new();
//! cart.add_line(SaleLine::new(1, 3)).unwrap();
//!
//! let totals = compute_totals(&cart, &catalog);
//! assert_eq!(totals.subtotal(), Money::from_major(3000));
//! assert_eq!(totals.tax_total(), Money::from_major(570));
//! assert_eq!(totals.grand_total(), Money::from_major(3570));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ProductId};
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY};

// =============================================================================
// Sale Line
// =============================================================================

/// One row of the new-sale form.
///
/// A freshly added row has no product selected and quantity 0; both are
/// legal while editing and only rejected at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: Option<ProductId>,
    pub quantity: u32,
}

impl SaleLine {
    /// A line with a product selected.
    pub const fn new(product_id: ProductId, quantity: u32) -> Self {
        SaleLine {
            product_id: Some(product_id),
            quantity,
        }
    }

    /// An unselected, quantity-0 row.
    pub const fn empty() -> Self {
        SaleLine {
            product_id: None,
            quantity: 0,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The ordered lines of a sale that has not been submitted.
///
/// ## Invariants
/// - At most MAX_CART_LINES (100) lines
/// - No line quantity above MAX_ITEM_QUANTITY (9999)
/// - The same product may appear on several lines; each is priced on its own
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<SaleLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Appends a line and returns its index.
    pub fn add_line(&mut self, line: SaleLine) -> CoreResult<usize> {
        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge { max: MAX_CART_LINES });
        }
        check_quantity(line.quantity)?;

        self.lines.push(line);
        Ok(self.lines.len() - 1)
    }

    /// Appends an unselected row, as the form's "add product" button does.
    pub fn add_empty_line(&mut self) -> CoreResult<usize> {
        self.add_line(SaleLine::empty())
    }

    /// Removes the line at `index` and returns it.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<SaleLine> {
        self.check_index(index)?;
        Ok(self.lines.remove(index))
    }

    /// Sets the quantity of the line at `index`.
    ///
    /// Zero is accepted: the row stays on the form and contributes nothing.
    pub fn update_quantity(&mut self, index: usize, quantity: u32) -> CoreResult<()> {
        self.check_index(index)?;
        check_quantity(quantity)?;

        self.lines[index] = SaleLine {
            quantity,
            ..self.lines[index]
        };
        Ok(())
    }

    /// Selects the product of the line at `index`, keeping its quantity.
    pub fn select_product(&mut self, index: usize, product_id: ProductId) -> CoreResult<()> {
        self.check_index(index)?;

        self.lines[index] = SaleLine {
            product_id: Some(product_id),
            ..self.lines[index]
        };
        Ok(())
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Number of lines, selected or not.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    /// Sum of quantities over every line.
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| l.quantity as u64).sum()
    }

    /// Checks the cart can be turned into a sale.
    ///
    /// ## Rejects
    /// - An empty cart
    /// - A line with no product selected
    /// - A line with quantity 0
    /// - A line whose product is not in `catalog`
    ///
    /// Lines are checked in order; the first problem is returned.
    pub fn check_submittable(&self, catalog: &Catalog) -> CoreResult<()> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        for (index, line) in self.lines.iter().enumerate() {
            let product_id = line
                .product_id
                .ok_or(CoreError::ProductNotSelected { index })?;

            if line.quantity == 0 {
                return Err(CoreError::ZeroQuantity { index });
            }

            if catalog.get(product_id).is_none() {
                return Err(CoreError::ProductNotFound(product_id));
            }
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> CoreResult<()> {
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound {
                index,
                len: self.lines.len(),
            });
        }
        Ok(())
    }
}

impl FromIterator<SaleLine> for Cart {
    /// Collects lines without the size checks; use [`Cart::add_line`] for
    /// user input.
    fn from_iter<I: IntoIterator<Item = SaleLine>>(iter: I) -> Self {
        Cart {
            lines: iter.into_iter().collect(),
        }
    }
}

fn check_quantity(quantity: u32) -> CoreResult<()> {
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Catalog
// =============================================================================

/// Products fetched when the form opened, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Builds a catalog. A repeated id replaces the earlier product in place.
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut catalog = Catalog {
            products: Vec::with_capacity(products.len()),
            index: HashMap::with_capacity(products.len()),
        };

        for product in products {
            match catalog.index.get(&product.id) {
                Some(&slot) => catalog.products[slot] = product,
                None => {
                    catalog.index.insert(product.id, catalog.products.len());
                    catalog.products.push(product);
                }
            }
        }
        catalog
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).map(|&slot| &self.products[slot])
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products in fetch order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Catalog::from_products(iter.into_iter().collect())
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Numbers for one priced line. These are what a sale detail records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineTotals {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
    pub subtotal: Money,
    pub tax_total: Money,
    pub total: Money,
}

/// Totals of a pending sale.
///
/// Only built by [`compute_totals`] and [`SaleTotals::add_line`], so
/// `grand_total == subtotal + tax_total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    subtotal: Money,
    tax_total: Money,
    grand_total: Money,
}

impl SaleTotals {
    /// All zero.
    pub fn zero() -> Self {
        SaleTotals::default()
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax_total(&self) -> Money {
        self.tax_total
    }

    pub fn grand_total(&self) -> Money {
        self.grand_total
    }

    /// Accumulates one line.
    pub fn add_line(&mut self, line: &LineTotals) {
        self.subtotal += line.subtotal;
        self.tax_total += line.tax_total;
        self.grand_total = self.subtotal + self.tax_total;
    }
}

/// Prices one line against the catalog.
///
/// Returns `None` when the line has no product selected, quantity 0, or a
/// product missing from the catalog.
pub fn compute_line(line: &SaleLine, catalog: &Catalog) -> Option<LineTotals> {
    if line.quantity == 0 {
        return None;
    }
    let product = catalog.get(line.product_id?)?;

    let subtotal = product.unit_price.multiply_quantity(line.quantity);
    let tax_total: Money = product
        .taxes
        .iter()
        .map(|tax| subtotal.calculate_tax(tax.rate))
        .sum();

    Some(LineTotals {
        product_id: product.id,
        quantity: line.quantity,
        unit_price: product.unit_price,
        subtotal,
        tax_total,
        total: subtotal + tax_total,
    })
}

/// Computes the totals of a cart. Pure, and never fails; sums saturate
/// instead of overflowing.
pub fn compute_totals(cart: &Cart, catalog: &Catalog) -> SaleTotals {
    priced_lines(cart, catalog).fold(SaleTotals::zero(), |mut totals, line| {
        totals.add_line(&line);
        totals
    })
}

/// Every line that prices, in cart order.
pub fn priced_lines<'a>(
    cart: &'a Cart,
    catalog: &'a Catalog,
) -> impl Iterator<Item = LineTotals> + 'a {
    cart.lines().iter().filter_map(move |line| compute_line(line, catalog))
}

/// Indexes of lines that price to nothing.
pub fn unresolved_lines(cart: &Cart, catalog: &Catalog) -> Vec<usize> {
    cart.lines()
        .iter()
        .enumerate()
        .filter(|(_, line)| compute_line(line, catalog).is_none())
        .map(|(index, _)| index)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
