//! Resource markers for every CRUD collection of the service.

use punto_core::drafts::{
    NewCompany, NewCustomer, NewEmployee, NewHeadquarter, NewProduct, NewSale, NewSaleDetail,
    NewSupplier, NewTax,
};
use punto_core::{
    Company, CompanyId, Customer, CustomerId, Employee, EmployeeId, Headquarter, HeadquarterId,
    Product, ProductId, Sale, SaleDetail, SaleDetailId, SaleId, Supplier, SupplierId, Tax, TaxId,
};

use super::Resource;

macro_rules! resource {
    ($(#[$doc:meta])* $marker:ident, $path:literal, $name:literal, $id:ty, $record:ty, $draft:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $marker;

        impl Resource for $marker {
            const PATH: &'static str = $path;
            const NAME: &'static str = $name;
            type Id = $id;
            type Record = $record;
            type Draft = $draft;

            fn id_of(record: &$record) -> $id {
                record.id
            }
        }
    };
}

resource!(
    /// `/headquarter`
    Headquarters, "/headquarter", "headquarter", HeadquarterId, Headquarter, NewHeadquarter
);
resource!(
    /// `/employee`
    Employees, "/employee", "employee", EmployeeId, Employee, NewEmployee
);
resource!(
    /// `/company`
    Companies, "/company", "company", CompanyId, Company, NewCompany
);
resource!(
    /// `/tax`
    Taxes, "/tax", "tax", TaxId, Tax, NewTax
);
resource!(
    /// `/product`
    Products, "/product", "product", ProductId, Product, NewProduct
);
resource!(
    /// `/supplier`
    Suppliers, "/supplier", "supplier", SupplierId, Supplier, NewSupplier
);
resource!(
    /// `/customer`
    Customers, "/customer", "customer", CustomerId, Customer, NewCustomer
);
resource!(
    /// `/sale-detail`
    SaleDetails, "/sale-detail", "sale detail", SaleDetailId, SaleDetail, NewSaleDetail
);
resource!(
    /// `/sale`
    Sales, "/sale", "sale", SaleId, Sale, NewSale
);
