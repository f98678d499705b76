use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::item;

/// The only status this core ever produces; lifecycle extension is future
/// work.
pub const STATUS_CREATED: &str = "CREATED";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub item_sku: String,
    pub qty: i32,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_new(user_id: i32, item_sku: &str, qty: i32) -> Result<(), ModelError> {
    if user_id <= 0 {
        return Err(ModelError::Validation("user_id must be positive".into()));
    }
    item::validate_sku(item_sku)?;
    if qty <= 0 {
        return Err(ModelError::Validation("qty must be positive".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: i32,
    item_sku: &str,
    qty: i32,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        user_id: Set(user_id),
        item_sku: Set(item_sku.to_string()),
        qty: Set(qty),
        status: Set(STATUS_CREATED.to_string()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}
