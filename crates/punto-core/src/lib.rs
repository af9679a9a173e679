//! # punto-core: Pure Business Logic for the Punto Back Office
//!
//! This crate holds every rule of the back office that does not need the
//! network: wire types, money, the cart aggregator, presence validation and
//! list search/paging. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Punto Back Office Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    punto-cli (clap)                             │   │
//! │  │    login ──► list ──► totals ──► checkout                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    punto-client (reqwest)                       │   │
//! │  │    Session, HttpTransport, Repository<R>, CheckoutService       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ punto-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │validation│ │ listing │ │   │
//! │  │   │ parties │ │ TaxRate │ │ Catalog │ │  drafts  │ │  Page   │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO AMBIENT STATE • PURE FUNCTIONS      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog and sales records (Product, Tax, Sale, ...)
//! - [`parties`] - Suppliers, customers, employees, company, headquarters
//! - [`drafts`] - Create/update request bodies
//! - [`money`] - Money type with integer arithmetic, currency display
//! - [`cart`] - Cart editing and `compute_totals`
//! - [`validation`] - Presence checks
//! - [`listing`] - Search filter and pagination
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use punto_core::money::Money;
//! use punto_core::types::TaxRate;
//!
//! let base = Money::from_major(1000);
//! let iva = base.calculate_tax(TaxRate::from_percent(19));
//! assert_eq!(iva, Money::from_major(190));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod drafts;
pub mod error;
pub mod listing;
pub mod money;
pub mod parties;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{compute_line, compute_totals, Cart, Catalog, LineTotals, SaleLine, SaleTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{CurrencyFormat, Money};
pub use parties::*;
pub use types::*;
pub use validation::{Validate, ValidationResult};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity on a single cart line.
///
/// Catches slips such as typing 10000 instead of 10.
pub const MAX_ITEM_QUANTITY: u32 = 9999;

/// Rows per page on list screens.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 6;
