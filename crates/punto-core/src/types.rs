//! # Domain Types
//!
//! Catalog and sales types exchanged with the back-office REST service.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │   SaleDetail    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  unit_price     │   │  subtotal       │   │  quantity       │       │
//! │  │  stock          │   │  tax_total      │   │  unit_price     │       │
//! │  │  taxes ─────────┼─┐ │  total          │   │  subtotal/total │       │
//! │  └─────────────────┘ │ └─────────────────┘   └─────────────────┘       │
//! │                      ▼                                                  │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Tax        │   │  PaymentMethod  │   │   Inventory     │       │
//! │  │  rate: TaxRate  │   │  Cash / Card    │   │  details[]      │       │
//! │  │  1900 = 19%     │   │  Transfer/Other │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! The service uses entity-prefixed camelCase names (`productName`,
//! `unitaryProductPrice`). Rust fields use plain names with serde renames.
//! Identifiers are assigned by the service and are plain integers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use ts_rs::TS;

use crate::money::{Money, ScaledVisitor};

// =============================================================================
// Identifiers
// =============================================================================

pub type ProductId = i64;
pub type TaxId = i64;
pub type SupplierId = i64;
pub type CustomerId = i64;
pub type EmployeeId = i64;
pub type CompanyId = i64;
pub type HeadquarterId = i64;
pub type SaleId = i64;
pub type SaleDetailId = i64;
pub type InventoryId = i64;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1900 bps = 19% (Colombian IVA)
///
/// On the wire the rate is a percentage, `"19.00"` or `19`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct TaxRate(#[ts(type = "number")] u32);

/// Upper bound of a tax rate: 100%.
pub const MAX_TAX_RATE_BPS: u32 = 10_000;

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from whole percent.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        TaxRate(percent * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The percentage as the service prints it, e.g. `19.00`.
    pub fn percentage_text(&self) -> String {
        TaxRate::percentage_of(self.0 as i64)
    }

    fn percentage_of(bps: i64) -> String {
        let sign = if bps < 0 { "-" } else { "" };
        let bps = bps.unsigned_abs();
        format!("{}{}.{:02}", sign, bps / 100, bps % 100)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// `19%`, `8.25%`, `5.5%`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_u32(self.0 / 100)
        } else {
            serializer.serialize_f64(self.0 as f64 / 100.0)
        }
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bps = deserializer.deserialize_any(ScaledVisitor {
            scale: 2,
            what: "a tax percentage",
        })?;
        match u32::try_from(bps) {
            Ok(bps) if bps <= MAX_TAX_RATE_BPS => Ok(TaxRate(bps)),
            _ => Err(serde::de::Error::custom(format!(
                "tax percentage out of range 0-100: {}",
                TaxRate::percentage_of(bps)
            ))),
        }
    }
}

// =============================================================================
// Tax
// =============================================================================

/// A tax that can be attached to products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Tax {
    #[serde(rename = "taxId")]
    pub id: TaxId,

    #[serde(rename = "taxName")]
    pub name: String,

    /// Percentage rate, 0-100 inclusive.
    #[serde(rename = "taxPercentage", default)]
    pub rate: TaxRate,

    #[serde(rename = "taxDescription", default)]
    pub description: Option<String>,
}

// =============================================================================
// References
// =============================================================================
// Nested objects the service embeds inside other records. Only the id is
// guaranteed; everything else depends on which relations were loaded.

/// A product embedded in another record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductRef {
    #[serde(rename = "productId")]
    pub id: ProductId,

    #[serde(rename = "productName", default)]
    pub name: Option<String>,

    #[serde(rename = "productDescription", default)]
    pub description: Option<String>,
}

/// A supplier embedded in a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierRef {
    #[serde(rename = "supplierId")]
    pub id: SupplierId,

    #[serde(rename = "supplierName", default)]
    pub name: Option<String>,

    #[serde(rename = "supplierNit", default)]
    pub nit: Option<String>,
}

/// A customer embedded in a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerRef {
    #[serde(rename = "customerId")]
    pub id: CustomerId,

    #[serde(rename = "customerName", default)]
    pub name: Option<String>,

    #[serde(rename = "customerIdentification", default)]
    pub identification: Option<String>,
}

/// A sale embedded in a sale detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRef {
    #[serde(rename = "saleId")]
    pub id: SaleId,

    #[serde(default)]
    pub customer: Option<CustomerRef>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    #[serde(rename = "productId")]
    pub id: ProductId,

    /// Display name.
    #[serde(rename = "productName")]
    pub name: String,

    #[serde(rename = "productDescription", default)]
    pub description: Option<String>,

    /// Unit price before tax.
    #[serde(rename = "unitaryProductPrice", default)]
    pub unit_price: Money,

    /// Units in stock.
    #[serde(rename = "productStock", default)]
    pub stock: i64,

    /// Taxes applied to every sale of this product, each off the line base.
    #[serde(default)]
    pub taxes: Vec<Tax>,

    #[serde(default)]
    pub suppliers: Vec<SupplierRef>,
}

impl Product {
    /// Sum of all tax rates on this product.
    pub fn combined_tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.taxes.iter().map(|t| t.rate.bps()).sum())
    }

    /// Tax names joined for list display, or `N/A`.
    pub fn tax_names(&self) -> String {
        if self.taxes.is_empty() {
            "N/A".to_string()
        } else {
            self.taxes
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    Other,
}

impl PaymentMethod {
    /// Wire name, e.g. `CASH`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Transfer => "TRANSFER",
            PaymentMethod::Other => "OTHER",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CASH" => Ok(PaymentMethod::Cash),
            "CARD" => Ok(PaymentMethod::Card),
            "TRANSFER" => Ok(PaymentMethod::Transfer),
            "OTHER" => Ok(PaymentMethod::Other),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "paymentMethod".to_string(),
                reason: format!("'{}' is not one of CASH, CARD, TRANSFER, OTHER", other),
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    #[serde(rename = "saleId")]
    pub id: SaleId,

    #[serde(rename = "saleDate")]
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    #[serde(rename = "subtotalSale", default)]
    pub subtotal: Money,

    #[serde(rename = "totalTaxesSale", default)]
    pub tax_total: Money,

    #[serde(rename = "totalSale", default)]
    pub total: Money,

    #[serde(rename = "paymentMethod")]
    pub payment_method: PaymentMethod,

    #[serde(default)]
    pub customer: Option<CustomerRef>,
}

impl Sale {
    /// Sale date as `YYYY-MM-DD`.
    pub fn date_text(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

// =============================================================================
// Sale Detail
// =============================================================================

/// One line of a recorded sale, with the numbers frozen at sale time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    #[serde(rename = "saleDetailId")]
    pub id: SaleDetailId,

    /// Units sold.
    #[serde(rename = "amount")]
    pub quantity: u32,

    #[serde(rename = "unitaryPrice", default)]
    pub unit_price: Money,

    /// Line base before tax.
    #[serde(default)]
    pub subtotal: Money,

    #[serde(rename = "subtotalTaxes", default)]
    pub tax_total: Money,

    #[serde(default)]
    pub total: Money,

    #[serde(default)]
    pub product: Option<ProductRef>,

    #[serde(default)]
    pub sale: Option<SaleRef>,
}

// =============================================================================
// Inventory
// =============================================================================

/// An inventory count recorded by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Inventory {
    #[serde(rename = "inventoryId")]
    pub id: InventoryId,

    #[serde(rename = "createdAt")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "inventoryDetails", default)]
    pub details: Vec<InventoryDetail>,
}

/// Stock movement of one product within an inventory count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryDetail {
    #[serde(rename = "inventoryDetailId", default)]
    pub id: Option<i64>,

    #[serde(rename = "initialAmount", default)]
    pub initial_amount: i64,

    #[serde(rename = "entryAmount", default)]
    pub entry_amount: i64,

    #[serde(rename = "outputAmount", default)]
    pub output_amount: i64,

    #[serde(rename = "finalAmount", default)]
    pub final_amount: i64,

    #[serde(rename = "consumedAmount", default)]
    pub consumed_amount: i64,

    #[serde(default)]
    pub product: Option<ProductRef>,
}

// =============================================================================
// Unit Tests
// =============================================================================
