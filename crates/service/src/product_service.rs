use models::category::{self, Entity as CategoryEntity};
use models::product::{self, Entity as ProductEntity};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set};

use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::picture;

/// A product joined with the category it belongs to.
pub type ProductWithCategory = (product::Model, Option<category::Model>);

/// List products with their categories, optionally a single page of them.
/// Pictures are expanded back to the raw image bytes.
pub async fn list_products(
    db: &DatabaseConnection,
    page: Option<Pagination>,
) -> Result<Vec<ProductWithCategory>, ServiceError> {
    let mut finder = ProductEntity::find().find_also_related(CategoryEntity);
    if let Some(p) = page {
        let (offset, limit) = p.to_offset_limit();
        finder = finder.offset(offset).limit(limit);
    }
    let rows = finder.all(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    rows.into_iter().map(expand_picture).collect()
}

/// Get a product by id, with its category and raw picture bytes.
pub async fn get_product(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<ProductWithCategory>, ServiceError> {
    let found = ProductEntity::find_by_id(id)
        .find_also_related(CategoryEntity)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    found.map(expand_picture).transpose()
}

/// List products whose name contains the given term, case-insensitively.
pub async fn filter_products_by_name(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<ProductWithCategory>, ServiceError> {
    let rows = ProductEntity::find()
        .find_also_related(CategoryEntity)
        .filter(Expr::col((ProductEntity, product::Column::Name)).ilike(format!("%{term}%")))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    rows.into_iter().map(expand_picture).collect()
}

/// Create a product after validation. The referenced category must exist and
/// the picture is stored zlib-compressed; the returned model carries the
/// stored bytes, not the raw ones.
pub async fn create_product(
    db: &DatabaseConnection,
    name: &str,
    price: i32,
    quantity: i32,
    picture_raw: &[u8],
    category_id: i64,
) -> Result<ProductWithCategory, ServiceError> {
    let cat = find_category(db, category_id).await?;
    let stored = picture::compress(picture_raw)?;
    // remaining validations are in models::product
    let created = product::create(db, name, price, quantity, stored, category_id).await?;
    Ok((created, Some(cat)))
}

/// Update a product with optional fields and validations.
pub async fn update_product(
    db: &DatabaseConnection,
    id: i64,
    name: Option<&str>,
    price: Option<i32>,
    quantity: Option<i32>,
    picture_raw: Option<&[u8]>,
    category_id: Option<i64>,
) -> Result<ProductWithCategory, ServiceError> {
    let current = ProductEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let Some(existing) = current else { return Err(ServiceError::not_found("product")); };

    product::validate_fields(
        name.unwrap_or(&existing.name),
        price.unwrap_or(existing.price),
        quantity.unwrap_or(existing.quantity),
    )?;
    if let Some(cid) = category_id {
        find_category(db, cid).await?;
    }

    let mut am: product::ActiveModel = existing.into();
    if let Some(n) = name { am.name = Set(n.to_string()); }
    if let Some(p) = price { am.price = Set(p); }
    if let Some(q) = quantity { am.quantity = Set(q); }
    if let Some(raw) = picture_raw { am.picture = Set(picture::compress(raw)?); }
    if let Some(cid) = category_id { am.category_id = Set(cid); }
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let cat = find_category(db, updated.category_id).await.ok();
    Ok((updated, cat))
}

/// Delete a product; returns true if deleted.
pub async fn delete_product(db: &DatabaseConnection, id: i64) -> Result<bool, ServiceError> {
    let res = ProductEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

async fn find_category(db: &DatabaseConnection, id: i64) -> Result<category::Model, ServiceError> {
    CategoryEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("category"))
}

fn expand_picture(
    (mut p, c): ProductWithCategory,
) -> Result<ProductWithCategory, ServiceError> {
    p.picture = picture::decompress(&p.picture)?;
    Ok((p, c))
}
