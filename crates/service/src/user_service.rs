use sea_orm::{DatabaseConnection, EntityTrait};

use crate::errors::ServiceError;
use models::user;

/// Create a new user; the email must be unique.
pub async fn create_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
) -> Result<user::Model, ServiceError> {
    let created = user::create(db, name, email).await?;
    Ok(created)
}

/// Get a user by id.
pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<Option<user::Model>, ServiceError> {
    let found = user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// List all users.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>, ServiceError> {
    let users = user::list(db).await?;
    Ok(users)
}
