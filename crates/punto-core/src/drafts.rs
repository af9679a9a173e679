//! # Drafts
//!
//! Request bodies for creating and updating records. The service assigns
//! ids, so drafts carry none of their own; relations are sent as link
//! objects holding just the related id (`{"taxId": 1}`).
//!
//! ```text
//! Product (read model) ──From──► NewProduct ──validate()──► POST /product
//!                                                      └──► PATCH /product/{id}
//! ```
//!
//! Every draft implements [`Validate`]; the client refuses to send a draft
//! that fails it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::cart::LineTotals;
use crate::error::ValidationError;
use crate::money::Money;
use crate::parties::{Company, CompanyLink, Customer, Employee, Supplier};
use crate::types::{
    CustomerId, HeadquarterId, PaymentMethod, Product, ProductId, SaleId, SupplierId, Tax, TaxId,
    TaxRate,
};
use crate::validation::{
    validate_email, validate_id, validate_price, validate_quantity, validate_required,
    validate_stock, validate_tax_rate, validate_totals, Validate, ValidationResult,
};

// =============================================================================
// Links
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxLink {
    #[serde(rename = "taxId")]
    pub id: TaxId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierLink {
    #[serde(rename = "supplierId")]
    pub id: SupplierId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HeadquarterLink {
    #[serde(rename = "headquarterId")]
    pub id: HeadquarterId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductLink {
    #[serde(rename = "productId")]
    pub id: ProductId,
}

// =============================================================================
// Catalog Drafts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewTax {
    #[serde(rename = "taxName")]
    pub name: String,

    #[serde(rename = "taxPercentage")]
    pub rate: TaxRate,

    #[serde(rename = "taxDescription", default)]
    pub description: Option<String>,
}

impl Validate for NewTax {
    fn validate(&self) -> ValidationResult<()> {
        validate_required("taxName", &self.name)?;
        validate_tax_rate(self.rate)
    }
}

impl From<&Tax> for NewTax {
    fn from(tax: &Tax) -> Self {
        NewTax {
            name: tax.name.clone(),
            rate: tax.rate,
            description: tax.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    #[serde(rename = "productName")]
    pub name: String,

    #[serde(rename = "productDescription", default)]
    pub description: Option<String>,

    #[serde(rename = "unitaryProductPrice")]
    pub unit_price: Money,

    #[serde(rename = "productStock")]
    pub stock: i64,

    #[serde(default)]
    pub taxes: Vec<TaxLink>,

    #[serde(default)]
    pub suppliers: Vec<SupplierLink>,
}

impl Validate for NewProduct {
    fn validate(&self) -> ValidationResult<()> {
        validate_required("productName", &self.name)?;
        validate_price("unitaryProductPrice", self.unit_price)?;
        validate_stock(self.stock)?;

        let mut seen = HashSet::new();
        for link in &self.taxes {
            validate_id("taxId", link.id)?;
            if !seen.insert(link.id) {
                return Err(ValidationError::Duplicate {
                    field: "taxId".to_string(),
                    value: link.id.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl From<&Product> for NewProduct {
    fn from(product: &Product) -> Self {
        NewProduct {
            name: product.name.clone(),
            description: product.description.clone(),
            unit_price: product.unit_price,
            stock: product.stock,
            taxes: product.taxes.iter().map(|t| TaxLink { id: t.id }).collect(),
            suppliers: product
                .suppliers
                .iter()
                .map(|s| SupplierLink { id: s.id })
                .collect(),
        }
    }
}

// =============================================================================
// Party Drafts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSupplier {
    #[serde(rename = "supplierName")]
    pub name: String,

    #[serde(rename = "supplierNit")]
    pub nit: String,

    #[serde(rename = "supplierPhone", default)]
    pub phone: Option<String>,

    #[serde(rename = "supplierEmail", default)]
    pub email: Option<String>,

    #[serde(rename = "supplierAddress", default)]
    pub address: Option<String>,

    #[serde(default)]
    pub headquarters: Vec<HeadquarterLink>,

    #[serde(default)]
    pub products: Vec<ProductLink>,
}

impl Validate for NewSupplier {
    fn validate(&self) -> ValidationResult<()> {
        validate_required("supplierName", &self.name)?;
        validate_required("supplierNit", &self.nit)?;
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            validate_email("supplierEmail", email)?;
        }
        Ok(())
    }
}

impl From<&Supplier> for NewSupplier {
    fn from(supplier: &Supplier) -> Self {
        NewSupplier {
            name: supplier.name.clone(),
            nit: supplier.nit.clone().unwrap_or_default(),
            phone: supplier.phone.clone(),
            email: supplier.email.clone(),
            address: supplier.address.clone(),
            headquarters: supplier
                .headquarters
                .iter()
                .map(|h| HeadquarterLink { id: h.id })
                .collect(),
            products: supplier
                .products
                .iter()
                .map(|p| ProductLink { id: p.id })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    #[serde(rename = "customerName")]
    pub name: String,

    #[serde(rename = "customerIdentification")]
    pub identification: String,

    #[serde(rename = "customerEmail")]
    pub email: String,

    #[serde(rename = "customerPhone", default)]
    pub phone: Option<String>,

    #[serde(rename = "customerAddress", default)]
    pub address: Option<String>,
}

impl Validate for NewCustomer {
    fn validate(&self) -> ValidationResult<()> {
        validate_required("customerName", &self.name)?;
        validate_required("customerIdentification", &self.identification)?;
        validate_email("customerEmail", &self.email)
    }
}

impl From<&Customer> for NewCustomer {
    fn from(customer: &Customer) -> Self {
        NewCustomer {
            name: customer.name.clone(),
            identification: customer.identification.clone().unwrap_or_default(),
            email: customer.email.clone().unwrap_or_default(),
            phone: customer.phone.clone(),
            address: customer.address.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewEmployee {
    #[serde(rename = "employeeName")]
    pub name: String,

    #[serde(rename = "employeeLastName")]
    pub last_name: String,

    #[serde(rename = "employeeIdentification")]
    pub identification: String,

    #[serde(rename = "employeeEmail")]
    pub email: String,
}

impl Validate for NewEmployee {
    fn validate(&self) -> ValidationResult<()> {
        validate_required("employeeName", &self.name)?;
        validate_required("employeeLastName", &self.last_name)?;
        validate_required("employeeIdentification", &self.identification)?;
        validate_email("employeeEmail", &self.email)
    }
}

impl From<&Employee> for NewEmployee {
    fn from(employee: &Employee) -> Self {
        NewEmployee {
            name: employee.name.clone(),
            last_name: employee.last_name.clone().unwrap_or_default(),
            identification: employee.identification.clone().unwrap_or_default(),
            email: employee.email.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCompany {
    #[serde(rename = "companyName")]
    pub name: String,

    #[serde(rename = "companyNit")]
    pub nit: String,

    #[serde(rename = "companyAddress", default)]
    pub address: Option<String>,

    #[serde(rename = "companyPhone", default)]
    pub phone: Option<String>,

    #[serde(rename = "companyEmail", default)]
    pub email: Option<String>,
}

impl Validate for NewCompany {
    fn validate(&self) -> ValidationResult<()> {
        validate_required("companyName", &self.name)?;
        validate_required("companyNit", &self.nit)
    }
}

impl From<&Company> for NewCompany {
    fn from(company: &Company) -> Self {
        NewCompany {
            name: company.name.clone(),
            nit: company.nit.clone().unwrap_or_default(),
            address: company.address.clone(),
            phone: company.phone.clone(),
            email: company.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewHeadquarter {
    #[serde(rename = "headquarterName")]
    pub name: String,

    #[serde(rename = "headquarterCity")]
    pub city: String,

    #[serde(rename = "headquarterAddress", default)]
    pub address: Option<String>,

    #[serde(rename = "headquarterPhone", default)]
    pub phone: Option<String>,

    pub company: CompanyLink,
}

impl Validate for NewHeadquarter {
    fn validate(&self) -> ValidationResult<()> {
        validate_required("headquarterName", &self.name)?;
        validate_required("headquarterCity", &self.city)?;
        validate_id("companyId", self.company.id)
    }
}

// =============================================================================
// Sales Drafts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    #[serde(rename = "saleDate")]
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    #[serde(rename = "subtotalSale")]
    pub subtotal: Money,

    #[serde(rename = "totalTaxesSale")]
    pub tax_total: Money,

    #[serde(rename = "totalSale")]
    pub total: Money,

    #[serde(rename = "paymentMethod")]
    pub payment_method: PaymentMethod,

    #[serde(rename = "customerId", default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
}

impl Validate for NewSale {
    fn validate(&self) -> ValidationResult<()> {
        validate_totals("totalSale", self.subtotal, self.tax_total, self.total)?;
        if let Some(id) = self.customer_id {
            validate_id("customerId", id)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSaleDetail {
    #[serde(rename = "amount")]
    pub quantity: u32,

    #[serde(rename = "unitaryPrice")]
    pub unit_price: Money,

    pub subtotal: Money,

    #[serde(rename = "subtotalTaxes")]
    pub tax_total: Money,

    pub total: Money,

    #[serde(rename = "productId")]
    pub product_id: ProductId,

    #[serde(rename = "saleId")]
    pub sale_id: SaleId,
}

impl NewSaleDetail {
    /// Detail for one computed cart line of a created sale.
    pub fn from_line(line: &LineTotals, sale_id: SaleId) -> Self {
        NewSaleDetail {
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal,
            tax_total: line.tax_total,
            total: line.total,
            product_id: line.product_id,
            sale_id,
        }
    }
}

impl Validate for NewSaleDetail {
    fn validate(&self) -> ValidationResult<()> {
        validate_quantity(self.quantity)?;
        validate_id("productId", self.product_id)?;
        validate_id("saleId", self.sale_id)?;
        validate_price("unitaryPrice", self.unit_price)?;

        if self.unit_price.multiply_quantity(self.quantity) != self.subtotal {
            return Err(ValidationError::Inconsistent {
                field: "subtotal".to_string(),
                reason: format!(
                    "{} x {} != {}",
                    self.quantity, self.unit_price, self.subtotal
                ),
            });
        }
        validate_totals("total", self.subtotal, self.tax_total, self.total)
    }
}

// =============================================================================
// Inventory Drafts
// =============================================================================

/// One product's counts in a new inventory, sent as part of a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInventoryDetail {
    #[serde(rename = "initialAmount")]
    pub initial_amount: i64,

    #[serde(rename = "entryAmount")]
    pub entry_amount: i64,

    #[serde(rename = "outputAmount")]
    pub output_amount: i64,

    #[serde(rename = "finalAmount")]
    pub final_amount: i64,

    #[serde(rename = "consumedAmount")]
    pub consumed_amount: i64,

    #[serde(rename = "productId")]
    pub product_id: ProductId,
}

impl Validate for NewInventoryDetail {
    fn validate(&self) -> ValidationResult<()> {
        validate_id("productId", self.product_id)?;
        let amounts = [
            ("initialAmount", self.initial_amount),
            ("entryAmount", self.entry_amount),
            ("outputAmount", self.output_amount),
            ("finalAmount", self.final_amount),
            ("consumedAmount", self.consumed_amount),
        ];
        for (field, value) in amounts {
            if value < 0 {
                return Err(ValidationError::OutOfRange {
                    field: field.to_string(),
                    min: 0,
                    max: i64::MAX,
                });
            }
        }
        Ok(())
    }
}

impl<T: Validate> Validate for [T] {
    fn validate(&self) -> ValidationResult<()> {
        self.iter().try_for_each(Validate::validate)
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> ValidationResult<()> {
        self.as_slice().validate()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn product_draft() -> NewProduct {
        NewProduct {
            name: "Arroz".to_string(),
            description: None,
            unit_price: Money::from_major(1000),
            stock: 10,
            taxes: vec![TaxLink { id: 1 }, TaxLink { id: 2 }],
            suppliers: vec![SupplierLink { id: 4 }],
        }
    }

    #[test]
    fn test_product_draft_wire_format() {
        let value = serde_json::to_value(product_draft()).unwrap();
        assert_eq!(
            value,
            json!({
                "productName": "Arroz",
                "productDescription": null,
                "unitaryProductPrice": 1000,
                "productStock": 10,
                "taxes": [{ "taxId": 1 }, { "taxId": 2 }],
                "suppliers": [{ "supplierId": 4 }]
            })
        );
    }

    #[test]
    fn test_product_draft_validation() {
        assert!(product_draft().validate().is_ok());

        let mut blank = product_draft();
        blank.name = "  ".to_string();
        assert_eq!(blank.validate(), Err(ValidationError::required("productName")));

        let mut negative = product_draft();
        negative.stock = -1;
        assert!(negative.validate().is_err());

        let mut duplicate = product_draft();
        duplicate.taxes.push(TaxLink { id: 1 });
        assert!(matches!(
            duplicate.validate(),
            Err(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_product_draft_from_read_model() {
        let product: Product = serde_json::from_value(json!({
            "productId": 7,
            "productName": "Pan",
            "unitaryProductPrice": "1500.00",
            "productStock": 3,
            "taxes": [{ "taxId": 1, "taxName": "IVA", "taxPercentage": "19.00" }],
            "suppliers": [{ "supplierId": 2 }]
        }))
        .unwrap();

        let draft = NewProduct::from(&product);
        assert_eq!(draft.unit_price, Money::from_major(1500));
        assert_eq!(draft.taxes, vec![TaxLink { id: 1 }]);
        assert_eq!(draft.suppliers, vec![SupplierLink { id: 2 }]);
    }

    #[test]
    fn test_headquarter_requires_company() {
        let draft = NewHeadquarter {
            name: "Norte".to_string(),
            city: "Medellín".to_string(),
            address: None,
            phone: None,
            company: CompanyLink { id: 0 },
        };
        assert_eq!(
            draft.validate(),
            Err(ValidationError::must_be_positive("companyId"))
        );
        assert_eq!(
            serde_json::to_value(&draft).unwrap()["company"],
            json!({ "companyId": 0 })
        );
    }

    #[test]
    fn test_sale_draft_totals_must_agree() {
        let mut sale = NewSale {
            date: Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap(),
            subtotal: Money::from_major(3000),
            tax_total: Money::from_major(570),
            total: Money::from_major(3570),
            payment_method: PaymentMethod::Cash,
            customer_id: None,
        };
        assert!(sale.validate().is_ok());
        assert!(serde_json::to_value(&sale).unwrap().get("customerId").is_none());

        sale.total = Money::from_major(3571);
        assert!(matches!(
            sale.validate(),
            Err(ValidationError::Inconsistent { .. })
        ));
    }

    #[test]
    fn test_sale_detail_from_line() {
        let line = LineTotals {
            product_id: 7,
            quantity: 3,
            unit_price: Money::from_major(1000),
            subtotal: Money::from_major(3000),
            tax_total: Money::from_major(570),
            total: Money::from_major(3570),
        };
        let detail = NewSaleDetail::from_line(&line, 12);
        assert!(detail.validate().is_ok());

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["amount"], json!(3));
        assert_eq!(value["subtotalTaxes"], json!(570));
        assert_eq!(value["saleId"], json!(12));
    }

    #[test]
    fn test_inventory_details_validate_as_batch() {
        let ok = NewInventoryDetail {
            initial_amount: 10,
            entry_amount: 5,
            output_amount: 3,
            final_amount: 12,
            consumed_amount: 0,
            product_id: 1,
        };
        let bad = NewInventoryDetail {
            output_amount: -1,
            ..ok.clone()
        };
        assert!(vec![ok.clone()].validate().is_ok());
        assert!(matches!(
            vec![ok, bad].validate(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
