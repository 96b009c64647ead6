//! Inventory handlers: public CRUD over stock items.

use axum::Router;
use axum::extract::State;
use axum::routing::get;

use crate::extract::{Json, ResourceId};
use crate::handler::Result;
use crate::handler::response::{Envelope, Identifier, Inventories, Inventory};
use crate::service::{InventoryPayload, InventoryService, ServiceState};
use crate::utility::tracing_targets::TRACING_TARGET_HANDLER;

/// Lists every inventory item.
#[tracing::instrument(skip_all)]
async fn list_inventories(
    State(inventories): State<InventoryService>,
) -> Result<Envelope<Inventories>> {
    let items = inventories.list().await?;
    let items: Inventories = items.into_iter().map(Inventory::from).collect();
    Ok(Envelope::success(items))
}

/// Returns a single inventory item.
#[tracing::instrument(skip_all, fields(id = id.get()))]
async fn read_inventory(
    State(inventories): State<InventoryService>,
    id: ResourceId,
) -> Result<Envelope<Inventory>> {
    let item = inventories.get(id.get()).await?;
    Ok(Envelope::success(item.into()))
}

/// Creates an inventory item.
#[tracing::instrument(skip_all)]
async fn create_inventory(
    State(inventories): State<InventoryService>,
    Json(payload): Json<InventoryPayload>,
) -> Result<Envelope<Identifier>> {
    let item = inventories.create(payload).await?;

    tracing::info!(
        target: TRACING_TARGET_HANDLER,
        id = item.id,
        code = %item.code,
        "inventory created"
    );

    Ok(Envelope::created(
        "Inventory created successfully",
        Identifier::new(item.id),
    ))
}

/// Replaces an inventory item.
#[tracing::instrument(skip_all, fields(id = id.get()))]
async fn update_inventory(
    State(inventories): State<InventoryService>,
    id: ResourceId,
    Json(payload): Json<InventoryPayload>,
) -> Result<Envelope<Identifier>> {
    let item = inventories.update(id.get(), payload).await?;
    Ok(Envelope::new(
        "Inventory updated successfully",
        Identifier::new(item.id),
    ))
}

/// Deletes an inventory item.
#[tracing::instrument(skip_all, fields(id = id.get()))]
async fn delete_inventory(
    State(inventories): State<InventoryService>,
    id: ResourceId,
) -> Result<Envelope<Identifier>> {
    let item = inventories.delete(id.get()).await?;

    tracing::info!(
        target: TRACING_TARGET_HANDLER,
        id = item.id,
        "inventory deleted"
    );

    Ok(Envelope::new(
        "Inventory deleted successfully",
        Identifier::new(item.id),
    ))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/inventories", get(list_inventories).post(create_inventory))
        .route(
            "/inventories/{id}",
            get(read_inventory)
                .put(update_inventory)
                .delete(delete_inventory),
        )
}
