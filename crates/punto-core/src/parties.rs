//! # Parties
//!
//! The people and organizations the back office keeps records of:
//! suppliers, customers, employees, the company and its headquarters.
//!
//! ```text
//! Company ◄──── Headquarter ◄──── Supplier ────► Product
//!                                     ▲
//! Customer ◄──── Sale                 │
//! Employee ◄──── Inventory      (many-to-many)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{CompanyId, CustomerId, EmployeeId, HeadquarterId, ProductRef, SupplierId};

// =============================================================================
// Supplier
// =============================================================================

/// A supplier of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Supplier {
    #[serde(rename = "supplierId")]
    pub id: SupplierId,

    #[serde(rename = "supplierName")]
    pub name: String,

    /// Colombian tax id.
    #[serde(rename = "supplierNit", default)]
    pub nit: Option<String>,

    #[serde(rename = "supplierPhone", default)]
    pub phone: Option<String>,

    #[serde(rename = "supplierEmail", default)]
    pub email: Option<String>,

    #[serde(rename = "supplierAddress", default)]
    pub address: Option<String>,

    #[serde(default)]
    pub headquarters: Vec<HeadquarterRef>,

    #[serde(default)]
    pub products: Vec<ProductRef>,
}

/// A headquarter embedded in a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HeadquarterRef {
    #[serde(rename = "headquarterId")]
    pub id: HeadquarterId,

    #[serde(rename = "headquarterName", default)]
    pub name: Option<String>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer that sales can be recorded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    #[serde(rename = "customerId")]
    pub id: CustomerId,

    #[serde(rename = "customerName")]
    pub name: String,

    #[serde(rename = "customerIdentification", default)]
    pub identification: Option<String>,

    #[serde(rename = "customerEmail", default)]
    pub email: Option<String>,

    #[serde(rename = "customerPhone", default)]
    pub phone: Option<String>,

    #[serde(rename = "customerAddress", default)]
    pub address: Option<String>,
}

// =============================================================================
// Employee
// =============================================================================

/// A back-office user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Employee {
    #[serde(rename = "employeeId")]
    pub id: EmployeeId,

    #[serde(rename = "employeeName")]
    pub name: String,

    #[serde(rename = "employeeLastName", default)]
    pub last_name: Option<String>,

    #[serde(rename = "employeeIdentification", default)]
    pub identification: Option<String>,

    #[serde(rename = "employeeEmail", default)]
    pub email: Option<String>,
}

impl Employee {
    /// First and last name, as shown in lists.
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.name, last),
            _ => self.name.clone(),
        }
    }
}

// =============================================================================
// Company & Headquarter
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Company {
    #[serde(rename = "companyId")]
    pub id: CompanyId,

    #[serde(rename = "companyName")]
    pub name: String,

    #[serde(rename = "companyNit", default)]
    pub nit: Option<String>,

    #[serde(rename = "companyAddress", default)]
    pub address: Option<String>,

    #[serde(rename = "companyPhone", default)]
    pub phone: Option<String>,

    #[serde(rename = "companyEmail", default)]
    pub email: Option<String>,
}

/// Link to a company by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompanyLink {
    #[serde(rename = "companyId")]
    pub id: CompanyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Headquarter {
    #[serde(rename = "headquarterId")]
    pub id: HeadquarterId,

    #[serde(rename = "headquarterName")]
    pub name: String,

    #[serde(rename = "headquarterCity", default)]
    pub city: Option<String>,

    #[serde(rename = "headquarterAddress", default)]
    pub address: Option<String>,

    #[serde(rename = "headquarterPhone", default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub company: Option<CompanyLink>,
}
