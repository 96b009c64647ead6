//! Inventory business rules.

use std::sync::Arc;

use avenger_postgres::model::{Inventory, NewInventory, UpdateInventory};
use avenger_postgres::types::{ConstraintViolation, InventoryConstraints, InventoryStatus};
use serde::Deserialize;

use super::store::{InventoryStore, StoreError};
use super::{Error, Result, storage_error};
use crate::validation::{Constraint, FieldValue, Rule, Validate, ValidationErrors};

/// Incoming inventory fields for create and update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryPayload {
    pub name: Option<String>,
    pub code: Option<String>,
    /// Defaults to zero when absent.
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl Validate for InventoryPayload {
    const RULES: &'static [Rule] = &[
        Rule::new("name", Constraint::Required),
        Rule::new("name", Constraint::MinLength(3)),
        Rule::new("name", Constraint::MaxLength(100)),
        Rule::new("code", Constraint::Required),
        Rule::new("code", Constraint::MinLength(3)),
        Rule::new("code", Constraint::MaxLength(50)),
        Rule::new("stock", Constraint::Gte(0.0)),
        Rule::new("description", Constraint::MaxLength(500)),
        Rule::new("status", Constraint::Required),
        Rule::new("status", Constraint::OneOf(InventoryStatus::NAMES)),
    ];

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "name" => self.name.as_deref().into(),
            "code" => self.code.as_deref().into(),
            "stock" => self.stock.into(),
            "description" => self.description.as_deref().into(),
            "status" => self.status.as_deref().into(),
            _ => FieldValue::Missing,
        }
    }
}

impl InventoryPayload {
    /// Validates the payload and normalizes it into an insertable row.
    ///
    /// Text is trimmed and the code is uppercased.
    pub fn into_new_inventory(self) -> Result<NewInventory> {
        self.validate().map_err(Error::validation)?;

        let status = self
            .status
            .as_deref()
            .unwrap_or_default()
            .parse::<InventoryStatus>()
            .map_err(|_| {
                Error::validation(ValidationErrors::single(
                    "status",
                    Constraint::OneOf(InventoryStatus::NAMES).message("status"),
                ))
            })?;

        Ok(NewInventory {
            name: self.name.unwrap_or_default().trim().to_owned(),
            code: self.code.unwrap_or_default().trim().to_uppercase(),
            stock: self.stock.unwrap_or(0),
            description: self.description.unwrap_or_default().trim().to_owned(),
            status,
        })
    }
}

/// Inventory operations on top of an [`InventoryStore`].
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
}

impl InventoryService {
    /// Creates a new service over `store`.
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Lists every inventory item.
    pub async fn list(&self) -> Result<Vec<Inventory>> {
        self.store
            .list_inventories()
            .await
            .map_err(storage_error("Failed to retrieve inventories"))
    }

    /// Returns the item with `id`.
    pub async fn get(&self, id: i32) -> Result<Inventory> {
        self.store
            .find_inventory(id)
            .await
            .map_err(storage_error("Failed to retrieve inventory"))?
            .ok_or_else(not_found)
    }

    /// Validates and stores a new item.
    pub async fn create(&self, payload: InventoryPayload) -> Result<Inventory> {
        let new_inventory = payload.into_new_inventory()?;

        self.store
            .create_inventory(new_inventory)
            .await
            .map_err(map_write_error("Failed to create inventory"))
    }

    /// Revalidates the full item and replaces the stored one.
    pub async fn update(&self, id: i32, payload: InventoryPayload) -> Result<Inventory> {
        let changes: UpdateInventory = payload.into_new_inventory()?.into();

        self.store
            .update_inventory(id, changes)
            .await
            .map_err(map_write_error("Failed to update inventory"))?
            .ok_or_else(not_found)
    }

    /// Deletes the item with `id`.
    pub async fn delete(&self, id: i32) -> Result<Inventory> {
        self.store
            .delete_inventory(id)
            .await
            .map_err(storage_error("Failed to delete inventory"))?
            .ok_or_else(not_found)
    }
}

fn not_found() -> Error {
    Error::not_found("Inventory not found")
}

fn map_write_error(message: &'static str) -> impl FnOnce(StoreError) -> Error {
    move |error| match error.conflict() {
        Some(ConstraintViolation::Inventory(InventoryConstraints::CodeUnique)) => {
            Error::conflict("Inventory code already exists")
        }
        _ => storage_error(message)(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::service::store::memory::MemoryInventoryStore;

    fn payload(code: &str) -> InventoryPayload {
        InventoryPayload {
            name: Some("  Laptop  ".into()),
            code: Some(code.into()),
            stock: None,
            description: None,
            status: Some("active".into()),
        }
    }

    fn service() -> InventoryService {
        InventoryService::new(Arc::new(MemoryInventoryStore::new()))
    }

    #[test]
    fn normalizes_after_validation() -> anyhow::Result<()> {
        let new_inventory = payload(" lap-001 ").into_new_inventory()?;
        assert_eq!(new_inventory.name, "Laptop");
        assert_eq!(new_inventory.code, "LAP-001");
        assert_eq!(new_inventory.stock, 0);
        assert_eq!(new_inventory.description, "");
        assert_eq!(new_inventory.status, InventoryStatus::Active);
        Ok(())
    }

    #[test]
    fn invalid_status_is_reported_on_status() {
        let mut invalid = payload("LAP-001");
        invalid.status = Some("lost".into());

        let error = invalid.into_new_inventory().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(
            error.errors().and_then(|e| e.message("status")),
            Some("status must be one of: active broken")
        );
    }

    #[test]
    fn negative_stock_and_missing_fields() {
        let invalid = InventoryPayload {
            stock: Some(-1),
            ..Default::default()
        };

        let error = invalid.into_new_inventory().unwrap_err();
        let errors = error.errors().unwrap();
        assert_eq!(errors.message("name"), Some("name is required"));
        assert_eq!(errors.message("code"), Some("code is required"));
        assert_eq!(errors.message("status"), Some("status is required"));
        assert_eq!(
            errors.message("stock"),
            Some("stock must be greater than or equal to 0")
        );
    }

    #[tokio::test]
    async fn duplicate_code_is_conflict() -> anyhow::Result<()> {
        let service = service();
        service.create(payload("LAP-001")).await?;

        let error = service.create(payload("lap-001")).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.message(), "Inventory code already exists");
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_missing_is_not_found() {
        let service = service();

        let error = service.update(42, payload("LAP-001")).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);

        let error = service.delete(42).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), "Inventory not found");
    }

    #[tokio::test]
    async fn update_replaces_item() -> anyhow::Result<()> {
        let service = service();
        let created = service.create(payload("LAP-001")).await?;

        let mut changes = payload("LAP-002");
        changes.stock = Some(5);
        changes.status = Some("broken".into());
        let updated = service.update(created.id, changes).await?;

        assert_eq!(updated.code, "LAP-002");
        assert_eq!(updated.stock, 5);
        assert_eq!(updated.status, InventoryStatus::Broken);
        assert_eq!(service.get(created.id).await?, updated);
        Ok(())
    }
}
