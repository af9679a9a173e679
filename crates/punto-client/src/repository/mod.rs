//! # Repositories
//!
//! One typed CRUD interface per entity kind of the REST service.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Resource (marker)          Repository<R> (async trait)                │
//! │   ──────────────────         ─────────────────────────────              │
//! │   PATH    "/product"         list()            GET    PATH              │
//! │   NAME    "product"          get(id)           GET    PATH/{id}         │
//! │   Id      ProductId          create(&draft)    POST   PATH              │
//! │   Record  Product            update(id,&draft) PATCH  PATH/{id}         │
//! │   Draft   NewProduct         delete(id)        DELETE PATH/{id}         │
//! │                                                                         │
//! │   RestRepository<R> ──► HttpTransport + Session                         │
//! │   (tests may supply their own Repository<R> in memory)                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Drafts are validated before anything is sent; a draft that fails its
//! presence checks never reaches the service.

mod inventory;
mod resources;

pub use inventory::{InventoryRepository, INVENTORY_PATH};
pub use resources::{
    Companies, Customers, Employees, Headquarters, Products, SaleDetails, Sales, Suppliers, Taxes,
};

use async_trait::async_trait;
use punto_core::Validate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ClientResult;
use crate::session::Session;
use crate::transport::HttpTransport;

// =============================================================================
// Resource Description
// =============================================================================

/// An entity kind exposed by the REST service.
pub trait Resource: Send + Sync + 'static {
    /// Collection path, e.g. `/product`.
    const PATH: &'static str;

    /// Name used in messages and logs.
    const NAME: &'static str;

    type Id: fmt::Display + Copy + Send + Sync;
    type Record: DeserializeOwned + Send + Sync;
    type Draft: Serialize + Validate + Send + Sync;

    fn id_of(record: &Self::Record) -> Self::Id;

    /// Path of one record.
    fn item_path(id: Self::Id) -> String {
        format!("{}/{}", Self::PATH, id)
    }
}

// =============================================================================
// Repository Trait
// =============================================================================

/// CRUD over one entity kind.
#[async_trait]
pub trait Repository<R: Resource>: Send + Sync {
    /// Every record, in service order.
    async fn list(&self) -> ClientResult<Vec<R::Record>>;

    /// One record. `NotFound` when the id is unknown.
    async fn get(&self, id: R::Id) -> ClientResult<R::Record>;

    /// Creates a record and returns it with its assigned id.
    async fn create(&self, draft: &R::Draft) -> ClientResult<R::Record>;

    /// Replaces the fields of an existing record.
    async fn update(&self, id: R::Id, draft: &R::Draft) -> ClientResult<()>;

    async fn delete(&self, id: R::Id) -> ClientResult<()>;
}

// =============================================================================
// REST Implementation
// =============================================================================

/// [`Repository`] over the REST service, bound to one session.
pub struct RestRepository<R> {
    transport: Arc<HttpTransport>,
    session: Session,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> RestRepository<R> {
    pub fn new(transport: Arc<HttpTransport>, session: Session) -> Self {
        RestRepository {
            transport,
            session,
            _resource: PhantomData,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl<R> Clone for RestRepository<R> {
    fn clone(&self) -> Self {
        RestRepository {
            transport: Arc::clone(&self.transport),
            session: self.session.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for RestRepository<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestRepository")
            .field("resource", &R::NAME)
            .field("session", &self.session)
            .finish()
    }
}

#[async_trait]
impl<R: Resource> Repository<R> for RestRepository<R> {
    async fn list(&self) -> ClientResult<Vec<R::Record>> {
        let records: Vec<R::Record> = self.transport.get(R::PATH, Some(&self.session)).await?;
        debug!(resource = R::NAME, count = records.len(), "Listed records");
        Ok(records)
    }

    async fn get(&self, id: R::Id) -> ClientResult<R::Record> {
        self.transport
            .get(&R::item_path(id), Some(&self.session))
            .await
    }

    async fn create(&self, draft: &R::Draft) -> ClientResult<R::Record> {
        draft.validate()?;
        let record: R::Record = self
            .transport
            .post(R::PATH, Some(&self.session), draft)
            .await?;
        info!(resource = R::NAME, id = %R::id_of(&record), "Created record");
        Ok(record)
    }

    async fn update(&self, id: R::Id, draft: &R::Draft) -> ClientResult<()> {
        draft.validate()?;
        self.transport
            .patch::<_, serde::de::IgnoredAny>(&R::item_path(id), Some(&self.session), draft)
            .await?;
        info!(resource = R::NAME, %id, "Updated record");
        Ok(())
    }

    async fn delete(&self, id: R::Id) -> ClientResult<()> {
        self.transport
            .delete(&R::item_path(id), Some(&self.session))
            .await?;
        info!(resource = R::NAME, %id, "Deleted record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ClientError;
    use punto_core::drafts::NewTax;
    use punto_core::TaxRate;

    fn unreachable_repository() -> RestRepository<Taxes> {
        // Nothing listens on port 9; every test here must fail before sending.
        let mut config = ClientConfig::default();
        config.api.base_url = "http://127.0.0.1:9".into();
        let transport = Arc::new(HttpTransport::new(&config).unwrap());
        let token = "eyJhbGciOiJIUzI1NiJ9.e30.c2ln";
        RestRepository::new(transport, Session::from_token(token).unwrap())
    }

    #[test]
    fn test_item_paths() {
        assert_eq!(Taxes::item_path(4), "/tax/4");
        assert_eq!(SaleDetails::item_path(12), "/sale-detail/12");
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_sent() {
        let repo = unreachable_repository();
        let draft = NewTax {
            name: "  ".into(),
            rate: TaxRate::from_percent(19),
            description: None,
        };

        let err = repo.create(&draft).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let err = repo.update(1, &draft).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_debug_names_resource() {
        let repo = unreachable_repository();
        let debug = format!("{:?}", repo);
        assert!(debug.contains("\"tax\""));
        assert!(debug.contains("<redacted>"));
    }
}
