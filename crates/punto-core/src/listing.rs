//! # Listing
//!
//! Search filtering and pagination of fetched collections, as every list
//! screen of the back office does it.
//!
//! ```text
//! GET /product ──► Vec<Product> ──filter_records(term)──► Vec<&Product>
//!                                                              │
//!                                         paginate(page, 6) ◄──┘
//!                                              │
//!                                              ▼
//!                                   Page { items, page 2 of 3 }
//! ```
//!
//! ## Example
//! ```rust
//! use punto_core::listing::{paginate, DEFAULT_ITEMS_PER_PAGE};
//!
//! let numbers: Vec<u32> = (1..=13).collect();
//! let page = paginate(numbers, 3, DEFAULT_ITEMS_PER_PAGE);
//! assert_eq!(page.total_pages, 3);
//! assert_eq!(page.items, vec![13]);
//! assert!(!page.has_next);
//! ```

use serde::Serialize;

use crate::parties::{Company, Customer, Employee, Headquarter, Supplier};
use crate::types::{Inventory, Product, Sale, SaleDetail, Tax};

pub use crate::DEFAULT_ITEMS_PER_PAGE;

// =============================================================================
// Search
// =============================================================================

/// A record that a list screen can search.
pub trait Searchable {
    /// True if any searchable field contains `needle`.
    ///
    /// `needle` is already lower-cased and trimmed, and never empty.
    fn matches(&self, needle: &str) -> bool;
}

fn contains(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}

fn contains_opt(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| contains(f, needle))
}

/// Keeps the records matching `term`, in input order. A blank term keeps all.
pub fn filter_records<'a, T: Searchable>(records: &'a [T], term: &str) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|r| r.matches(&needle)).collect()
}

impl Searchable for Product {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle) || contains_opt(self.description.as_deref(), needle)
    }
}

impl Searchable for Tax {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || contains_opt(self.description.as_deref(), needle)
            || self.rate.percentage_text().contains(needle)
    }
}

impl Searchable for Customer {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || contains_opt(self.identification.as_deref(), needle)
            || contains_opt(self.email.as_deref(), needle)
            || contains_opt(self.phone.as_deref(), needle)
    }
}

impl Searchable for Employee {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || contains_opt(self.last_name.as_deref(), needle)
            || contains_opt(self.email.as_deref(), needle)
            || contains_opt(self.identification.as_deref(), needle)
    }
}

impl Searchable for Supplier {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || contains_opt(self.nit.as_deref(), needle)
            || contains_opt(self.email.as_deref(), needle)
            || contains_opt(self.phone.as_deref(), needle)
    }
}

impl Searchable for Sale {
    fn matches(&self, needle: &str) -> bool {
        contains(self.payment_method.as_str(), needle)
            || self.id.to_string().contains(needle)
            || self.date_text().contains(needle)
    }
}

impl Searchable for SaleDetail {
    fn matches(&self, needle: &str) -> bool {
        let product_name = self.product.as_ref().and_then(|p| p.name.as_deref());
        contains_opt(product_name, needle)
            || self.unit_price.to_string().contains(needle)
            || self
                .sale
                .as_ref()
                .is_some_and(|s| s.id.to_string().contains(needle))
    }
}

impl Searchable for Company {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || contains_opt(self.nit.as_deref(), needle)
            || contains_opt(self.email.as_deref(), needle)
    }
}

impl Searchable for Headquarter {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || contains_opt(self.city.as_deref(), needle)
            || contains_opt(self.address.as_deref(), needle)
    }
}

/// Filters inventories down to their matching details.
///
/// A detail matches when its product name or description contains the term,
/// or when its inventory's id does. Inventories left with no details are
/// dropped.
pub fn filter_inventories(inventories: &[Inventory], term: &str) -> Vec<Inventory> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return inventories.to_vec();
    }

    inventories
        .iter()
        .filter_map(|inventory| {
            let id_matches = inventory.id.to_string().contains(&needle);
            let details: Vec<_> = inventory
                .details
                .iter()
                .filter(|detail| {
                    let product = detail.product.as_ref();
                    id_matches
                        || contains_opt(product.and_then(|p| p.name.as_deref()), &needle)
                        || contains_opt(product.and_then(|p| p.description.as_deref()), &needle)
                })
                .cloned()
                .collect();

            (!details.is_empty()).then(|| Inventory {
                details,
                ..inventory.clone()
            })
        })
        .collect()
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, after clamping.
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Cuts one page out of `items`.
///
/// ## Rules
/// - `page` is 1-based and clamped to `1..=max(total_pages, 1)`
/// - `per_page == 0` is treated as 1
/// - An empty list yields page 1 of 0 with no items
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * per_page;
    let items: Vec<T> = items.into_iter().skip(start).take(per_page).collect();

    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
        has_previous: page > 1,
        has_next: page < total_pages,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{InventoryDetail, PaymentMethod, ProductRef, TaxRate};
    use chrono::{TimeZone, Utc};

    fn product(id: i64, name: &str, description: Option<&str>) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            unit_price: Money::from_major(1000),
            stock: 1,
            taxes: vec![],
            suppliers: vec![],
        }
    }

    fn detail(name: &str) -> InventoryDetail {
        InventoryDetail {
            id: None,
            initial_amount: 1,
            entry_amount: 0,
            output_amount: 0,
            final_amount: 1,
            consumed_amount: 0,
            product: Some(ProductRef {
                id: 1,
                name: Some(name.to_string()),
                description: None,
            }),
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let products = vec![
            product(1, "Arroz Diana", None),
            product(2, "Aceite", Some("Girasol ARROZ-free")),
            product(3, "Pan", None),
        ];

        let ids: Vec<i64> = filter_records(&products, "  ARROZ ").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(filter_records(&products, "").len(), 3);
        assert!(filter_records(&products, "leche").is_empty());
    }

    #[test]
    fn test_tax_matches_percentage() {
        let tax = Tax {
            id: 1,
            name: "IVA".to_string(),
            rate: TaxRate::from_percent(19),
            description: None,
        };
        assert!(tax.matches("19.00"));
        assert!(tax.matches("iva"));
        assert!(!tax.matches("5.00"));
    }

    #[test]
    fn test_sale_matches_method_id_and_date() {
        let sale = Sale {
            id: 42,
            date: Utc.with_ymd_and_hms(2024, 5, 3, 10, 0, 0).unwrap(),
            subtotal: Money::zero(),
            tax_total: Money::zero(),
            total: Money::zero(),
            payment_method: PaymentMethod::Transfer,
            customer: None,
        };
        assert!(sale.matches("trans"));
        assert!(sale.matches("42"));
        assert!(sale.matches("2024-05"));
        assert!(!sale.matches("cash"));
    }

    #[test]
    fn test_filter_inventories_keeps_matching_details() {
        let inventories = vec![
            Inventory {
                id: 10,
                created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                details: vec![detail("Arroz"), detail("Frijol")],
            },
            Inventory {
                id: 11,
                created_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
                details: vec![detail("Leche")],
            },
        ];

        let filtered = filter_inventories(&inventories, "arroz");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].details.len(), 1);

        // Inventory id matches keep every detail
        let by_id = filter_inventories(&inventories, "11");
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].id, 11);

        assert_eq!(filter_inventories(&inventories, " ").len(), 2);
        assert!(filter_inventories(&inventories, "queso").is_empty());
    }

    #[test]
    fn test_paginate_counts_pages() {
        let items: Vec<u32> = (1..=13).collect();

        let first = paginate(items.clone(), 1, 6);
        assert_eq!(first.items, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_previous);
        assert!(first.has_next);

        let last = paginate(items, 3, 6);
        assert_eq!(last.items, vec![13]);
        assert!(last.has_previous);
        assert!(!last.has_next);
    }

    #[test]
    fn test_paginate_clamps() {
        let items: Vec<u32> = (1..=4).collect();
        assert_eq!(paginate(items.clone(), 0, 3).page, 1);
        assert_eq!(paginate(items.clone(), 99, 3).page, 2);
        assert_eq!(paginate(items, 1, 0).per_page, 1);

        let empty = paginate(Vec::<u32>::new(), 5, 6);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.items.is_empty());
        assert!(!empty.has_next);
    }
}
