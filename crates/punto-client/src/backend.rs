//! # Backend
//!
//! Entry point of the client: one transport shared by every repository.
//!
//! ```text
//! let backend = Backend::new(&config)?;
//! let session = backend.login(email, password).await?;
//! let products = backend.products(&session).list().await?;
//! ```

use punto_core::Catalog;
use std::sync::Arc;
use tracing::debug;

use crate::auth;
use crate::checkout::CheckoutService;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::repository::{
    Companies, Customers, Employees, Headquarters, InventoryRepository, Products, Repository,
    Resource, RestRepository, SaleDetails, Sales, Suppliers, Taxes,
};
use crate::session::Session;
use crate::transport::HttpTransport;

/// Hands out repositories for a session. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Backend {
    transport: Arc<HttpTransport>,
}

impl Backend {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Backend::from_transport(HttpTransport::new(config)?))
    }

    pub fn from_transport(transport: HttpTransport) -> Self {
        Backend {
            transport: Arc::new(transport),
        }
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        auth::login(&self.transport, email, password).await
    }

    /// Repository of any resource kind.
    pub fn repository<R: Resource>(&self, session: &Session) -> RestRepository<R> {
        RestRepository::new(Arc::clone(&self.transport), session.clone())
    }

    pub fn headquarters(&self, session: &Session) -> RestRepository<Headquarters> {
        self.repository(session)
    }

    pub fn employees(&self, session: &Session) -> RestRepository<Employees> {
        self.repository(session)
    }

    pub fn companies(&self, session: &Session) -> RestRepository<Companies> {
        self.repository(session)
    }

    pub fn taxes(&self, session: &Session) -> RestRepository<Taxes> {
        self.repository(session)
    }

    pub fn products(&self, session: &Session) -> RestRepository<Products> {
        self.repository(session)
    }

    pub fn suppliers(&self, session: &Session) -> RestRepository<Suppliers> {
        self.repository(session)
    }

    pub fn customers(&self, session: &Session) -> RestRepository<Customers> {
        self.repository(session)
    }

    pub fn sale_details(&self, session: &Session) -> RestRepository<SaleDetails> {
        self.repository(session)
    }

    pub fn sales(&self, session: &Session) -> RestRepository<Sales> {
        self.repository(session)
    }

    pub fn inventory(&self, session: &Session) -> InventoryRepository {
        InventoryRepository::new(Arc::clone(&self.transport), session.clone())
    }

    /// Snapshot of the product list for pricing a cart.
    pub async fn catalog(&self, session: &Session) -> ClientResult<Catalog> {
        let products = self.products(session).list().await?;
        let catalog = Catalog::from_products(products);
        debug!(products = catalog.len(), "Fetched catalog");
        Ok(catalog)
    }

    /// Checkout over the REST sale and sale-detail collections.
    pub fn checkout(
        &self,
        session: &Session,
    ) -> CheckoutService<RestRepository<Sales>, RestRepository<SaleDetails>> {
        CheckoutService::new(self.sales(session), self.sale_details(session))
    }
}
