//! Plain-text rendering of records, pages and totals.

use punto_core::listing::Page;
use punto_core::{
    Company, CurrencyFormat, Customer, Employee, Headquarter, Inventory, LineTotals, Product, Sale,
    SaleDetail, SaleTotals, Supplier, Tax,
};

/// A record printable as one table row.
pub trait Row {
    const HEADER: &'static str;

    fn row(&self, money: &CurrencyFormat) -> String;
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

impl Row for Product {
    const HEADER: &'static str = "ID     NAME                       PRICE            STOCK    TAX  TAXES";

    fn row(&self, money: &CurrencyFormat) -> String {
        format!(
            "{:<6} {:<26} {:>15} {:>6} {:>6}  {}",
            self.id,
            self.name,
            money.format(self.unit_price),
            self.stock,
            self.combined_tax_rate().to_string(),
            self.tax_names()
        )
    }
}

impl Row for Tax {
    const HEADER: &'static str = "ID     NAME                 RATE     DESCRIPTION";

    fn row(&self, _money: &CurrencyFormat) -> String {
        format!(
            "{:<6} {:<20} {:>7}  {}",
            self.id,
            self.name,
            self.rate.to_string(),
            opt(&self.description)
        )
    }
}

impl Row for Customer {
    const HEADER: &'static str = "ID     NAME                       IDENTIFICATION   EMAIL";

    fn row(&self, _money: &CurrencyFormat) -> String {
        format!(
            "{:<6} {:<26} {:<16} {}",
            self.id,
            self.name,
            opt(&self.identification),
            opt(&self.email)
        )
    }
}

impl Row for Employee {
    const HEADER: &'static str = "ID     NAME                       IDENTIFICATION   EMAIL";

    fn row(&self, _money: &CurrencyFormat) -> String {
        format!(
            "{:<6} {:<26} {:<16} {}",
            self.id,
            self.full_name(),
            opt(&self.identification),
            opt(&self.email)
        )
    }
}

impl Row for Supplier {
    const HEADER: &'static str = "ID     NAME                       NIT              PHONE";

    fn row(&self, _money: &CurrencyFormat) -> String {
        format!(
            "{:<6} {:<26} {:<16} {}",
            self.id,
            self.name,
            opt(&self.nit),
            opt(&self.phone)
        )
    }
}

impl Row for Company {
    const HEADER: &'static str = "ID     NAME                       NIT              ADDRESS";

    fn row(&self, _money: &CurrencyFormat) -> String {
        format!(
            "{:<6} {:<26} {:<16} {}",
            self.id,
            self.name,
            opt(&self.nit),
            opt(&self.address)
        )
    }
}

impl Row for Headquarter {
    const HEADER: &'static str = "ID     NAME                       CITY             ADDRESS";

    fn row(&self, _money: &CurrencyFormat) -> String {
        format!(
            "{:<6} {:<26} {:<16} {}",
            self.id,
            self.name,
            opt(&self.city),
            opt(&self.address)
        )
    }
}

impl Row for Sale {
    const HEADER: &'static str = "ID     DATE        PAYMENT   CUSTOMER              TOTAL";

    fn row(&self, money: &CurrencyFormat) -> String {
        let customer = self
            .customer
            .as_ref()
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{:<6} {:<11} {:<9} {:<16} {:>15}",
            self.id,
            self.date_text(),
            self.payment_method.as_str(),
            customer,
            money.format(self.total)
        )
    }
}

impl Row for SaleDetail {
    const HEADER: &'static str = "ID     SALE   PRODUCT                QTY           TOTAL";

    fn row(&self, money: &CurrencyFormat) -> String {
        let sale = self
            .sale
            .as_ref()
            .map(|s| s.id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let product = self
            .product
            .as_ref()
            .and_then(|p| p.name.clone())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{:<6} {:<6} {:<20} {:>5} {:>15}",
            self.id,
            sale,
            product,
            self.quantity,
            money.format(self.total)
        )
    }
}

impl Row for Inventory {
    const HEADER: &'static str = "ID     CREATED      PRODUCT              INITIAL  IN  OUT  FINAL";

    fn row(&self, _money: &CurrencyFormat) -> String {
        let created = self.created_at.format("%Y-%m-%d");
        if self.details.is_empty() {
            return format!("{:<6} {:<12} (no details)", self.id, created);
        }
        self.details
            .iter()
            .map(|d| {
                let product = d
                    .product
                    .as_ref()
                    .and_then(|p| p.name.clone())
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "{:<6} {:<12} {:<20} {:>7} {:>3} {:>4} {:>6}",
                    self.id,
                    created,
                    product,
                    d.initial_amount,
                    d.entry_amount,
                    d.output_amount,
                    d.final_amount
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<T: Row> Row for &T {
    const HEADER: &'static str = T::HEADER;

    fn row(&self, money: &CurrencyFormat) -> String {
        (**self).row(money)
    }
}

/// Renders a page with its header and a position footer.
pub fn render_page<T: Row>(page: &Page<T>, money: &CurrencyFormat) -> String {
    if page.total_items == 0 {
        return "No records found.".to_string();
    }

    let mut out = String::from(T::HEADER);
    for item in &page.items {
        out.push('\n');
        out.push_str(&item.row(money));
    }
    out.push_str(&format!(
        "\n\nPage {} of {} ({} records)",
        page.page, page.total_pages, page.total_items
    ));
    out
}

/// Per-line breakdown followed by the sale totals.
pub fn render_totals(lines: &[LineTotals], totals: &SaleTotals, money: &CurrencyFormat) -> String {
    let mut out = String::from("PRODUCT   QTY      UNIT PRICE        SUBTOTAL           TAXES           TOTAL");
    for line in lines {
        out.push_str(&format!(
            "\n{:<8} {:>4} {:>15} {:>15} {:>15} {:>15}",
            line.product_id,
            line.quantity,
            money.format(line.unit_price),
            money.format(line.subtotal),
            money.format(line.tax_total),
            money.format(line.total)
        ));
    }
    out.push_str(&format!(
        "\n\nSubtotal: {}\nTaxes:    {}\nTotal:    {}",
        money.format(totals.subtotal()),
        money.format(totals.tax_total()),
        money.format(totals.grand_total())
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use punto_core::listing::paginate;
    use punto_core::{compute_totals, Cart, Catalog, Money, SaleLine, TaxRate};

    fn product(id: i64) -> Product {
        Product {
            id,
            name: format!("Item {}", id),
            description: None,
            unit_price: Money::from_major(1000),
            stock: 5,
            taxes: vec![Tax {
                id: 1,
                name: "IVA".into(),
                rate: TaxRate::from_percent(19),
                description: None,
            }],
            suppliers: vec![],
        }
    }

    #[test]
    fn test_render_page_footer() {
        let products: Vec<Product> = (1..=13).map(product).collect();
        let page = paginate(products.iter().collect::<Vec<_>>(), 3, 6);
        let text = render_page(&page, &CurrencyFormat::default());

        assert!(text.starts_with(Product::HEADER));
        assert!(text.contains("Item 13"));
        assert!(text.ends_with("Page 3 of 3 (13 records)"));
    }

    #[test]
    fn test_product_row_shows_combined_rate() {
        let mut item = product(4);
        item.taxes.push(Tax {
            id: 2,
            name: "Consumo".into(),
            rate: TaxRate::from_bps(550),
            description: None,
        });
        let row = item.row(&CurrencyFormat::default());

        assert!(row.contains("24.5%"));
        assert!(row.ends_with("IVA, Consumo"));
        assert!(row.contains("$ 1.000"));
    }

    #[test]
    fn test_render_empty_page() {
        let page = paginate(Vec::<&Product>::new(), 1, 6);
        assert_eq!(render_page(&page, &CurrencyFormat::default()), "No records found.");
    }

    #[test]
    fn test_render_totals_uses_currency_format() {
        let catalog = Catalog::from_products(vec![product(1)]);
        let cart: Cart = vec![SaleLine::new(1, 3)].into_iter().collect();
        let totals = compute_totals(&cart, &catalog);
        let lines: Vec<_> = punto_core::cart::priced_lines(&cart, &catalog).collect();

        let text = render_totals(&lines, &totals, &CurrencyFormat::default());
        assert!(text.contains("Subtotal: $ 3.000"));
        assert!(text.contains("Taxes:    $ 570"));
        assert!(text.contains("Total:    $ 3.570"));
    }
}
