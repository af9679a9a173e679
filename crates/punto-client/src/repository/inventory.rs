//! Inventory counts: listed as a collection, created per employee.
//!
//! ```text
//! GET  /inventory                 -> [Inventory]
//! POST /inventory/{employeeId}    <- [NewInventoryDetail, ...]
//! ```

use punto_core::drafts::NewInventoryDetail;
use punto_core::{EmployeeId, Inventory, Validate, ValidationError};
use serde::de::IgnoredAny;
use std::sync::Arc;
use tracing::info;

use crate::error::{ClientError, ClientResult};
use crate::session::Session;
use crate::transport::HttpTransport;

pub const INVENTORY_PATH: &str = "/inventory";

/// Inventory endpoints, bound to one session.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    transport: Arc<HttpTransport>,
    session: Session,
}

impl InventoryRepository {
    pub fn new(transport: Arc<HttpTransport>, session: Session) -> Self {
        InventoryRepository { transport, session }
    }

    pub async fn list(&self) -> ClientResult<Vec<Inventory>> {
        self.transport.get(INVENTORY_PATH, Some(&self.session)).await
    }

    /// Records a count made by `employee_id`.
    ///
    /// ## Errors
    /// `Validation` when `details` is empty or any detail fails its checks.
    pub async fn create_for_employee(
        &self,
        employee_id: EmployeeId,
        details: &[NewInventoryDetail],
    ) -> ClientResult<()> {
        if details.is_empty() {
            return Err(ValidationError::required("inventoryDetails").into());
        }
        details.validate()?;

        let path = format!("{}/{}", INVENTORY_PATH, employee_id);
        self.transport
            .post::<_, IgnoredAny>(&path, Some(&self.session), details)
            .await?;

        info!(employee_id, lines = details.len(), "Recorded inventory");
        Ok(())
    }

    /// [`InventoryRepository::create_for_employee`] for the logged-in employee.
    pub async fn create(&self, details: &[NewInventoryDetail]) -> ClientResult<()> {
        let employee_id = self
            .session
            .employee_id()
            .ok_or_else(|| ClientError::InvalidToken("token carries no employee id".into()))?;
        self.create_for_employee(employee_id, details).await
    }
}
