use models::category::{self, Entity as CategoryEntity};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QuerySelect, Set};

use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// List categories, optionally a single page of them.
pub async fn list_categories(
    db: &DatabaseConnection,
    page: Option<Pagination>,
) -> Result<Vec<category::Model>, ServiceError> {
    let mut finder = CategoryEntity::find();
    if let Some(p) = page {
        let (offset, limit) = p.to_offset_limit();
        finder = finder.offset(offset).limit(limit);
    }
    let rows = finder.all(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Get a category by id.
pub async fn get_category(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<category::Model>, ServiceError> {
    let found = CategoryEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// Create a category after validation.
pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
) -> Result<category::Model, ServiceError> {
    // validations are in models::category
    let created = category::create(db, name, description).await?;
    Ok(created)
}

/// Update a category with optional fields and validations.
pub async fn update_category(
    db: &DatabaseConnection,
    id: i64,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<category::Model, ServiceError> {
    let current = CategoryEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let Some(existing) = current else { return Err(ServiceError::not_found("category")); };
    let mut am: category::ActiveModel = existing.into();
    if let Some(n) = name {
        category::validate_name(n)?;
        am.name = Set(n.to_string());
    }
    if let Some(d) = description {
        am.description = Set(d.to_string());
    }
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Delete a category; returns true if deleted.
pub async fn delete_category(db: &DatabaseConnection, id: i64) -> Result<bool, ServiceError> {
    let res = CategoryEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}
