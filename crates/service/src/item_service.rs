use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::info;

use crate::errors::ServiceError;
use models::item;

/// Create a new item; the SKU must be unique.
pub async fn create_item(
    db: &DatabaseConnection,
    name: &str,
    sku: &str,
    stock: i32,
) -> Result<item::Model, ServiceError> {
    let created = item::create(db, name, sku, stock).await?;
    Ok(created)
}

/// Get an item by id.
pub async fn get_item(db: &DatabaseConnection, id: i32) -> Result<Option<item::Model>, ServiceError> {
    let found = item::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// Get an item by SKU.
pub async fn get_item_by_sku(
    db: &DatabaseConnection,
    sku: &str,
) -> Result<Option<item::Model>, ServiceError> {
    let found = item::find_by_sku(db, sku).await?;
    Ok(found)
}

/// List all items.
pub async fn list_items(db: &DatabaseConnection) -> Result<Vec<item::Model>, ServiceError> {
    let items = item::list(db).await?;
    Ok(items)
}

/// Decrement an item's stock by `qty`. Fails with `NotFound` for an unknown
/// SKU and `Conflict` when the remaining stock is insufficient.
pub async fn reserve_stock(
    db: &DatabaseConnection,
    sku: &str,
    qty: i32,
) -> Result<item::Model, ServiceError> {
    if qty <= 0 {
        return Err(ServiceError::Validation("qty must be positive".into()));
    }
    let found = item::find_by_sku(db, sku).await?;
    let current = match found {
        Some(m) => m,
        None => return Err(ServiceError::not_found("item")),
    };
    if current.stock < qty {
        return Err(ServiceError::Conflict("insufficient stock".into()));
    }
    let remaining = current.stock - qty;
    let updated = item::set_stock(db, current, remaining).await?;
    info!(sku = %updated.sku, qty, remaining, "reserved stock");
    Ok(updated)
}
