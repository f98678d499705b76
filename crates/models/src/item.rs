use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub sku: String,
    pub stock: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_sku(sku: &str) -> Result<(), ModelError> {
    if sku.is_empty() || sku.len() > 60 {
        return Err(ModelError::Validation("sku must be 1-60 characters".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    sku: &str,
    stock: i32,
) -> Result<Model, ModelError> {
    if name.is_empty() || name.len() > 100 {
        return Err(ModelError::Validation("name must be 1-100 characters".into()));
    }
    validate_sku(sku)?;
    if stock < 0 {
        return Err(ModelError::Validation("stock must not be negative".into()));
    }
    if find_by_sku(db, sku).await?.is_some() {
        return Err(ModelError::Conflict("sku already exists".into()));
    }
    let am = ActiveModel {
        name: Set(name.to_string()),
        sku: Set(sku.to_string()),
        stock: Set(stock),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_sku(db: &DatabaseConnection, sku: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Sku.eq(sku))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn set_stock(db: &DatabaseConnection, model: Model, stock: i32) -> Result<Model, ModelError> {
    let mut am: ActiveModel = model.into();
    am.stock = Set(stock);
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}
