use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::category;
use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub price: i32,
    pub quantity: i32,
    /// Stored zlib-compressed; serialized as base64 in JSON payloads.
    #[serde(with = "picture_base64")]
    pub picture: Vec<u8>,
    pub category_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Category,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::CategoryId)
                .to(category::Column::Id)
                .into(),
        }
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_fields(name: &str, price: i32, quantity: i32) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    if price < 0 {
        return Err(errors::ModelError::Validation("price must not be negative".into()));
    }
    if quantity < 0 {
        return Err(errors::ModelError::Validation("quantity must not be negative".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    price: i32,
    quantity: i32,
    picture: Vec<u8>,
    category_id: i64,
) -> Result<Model, errors::ModelError> {
    validate_fields(name, price, quantity)?;
    let am = ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        price: Set(price),
        quantity: Set(quantity),
        picture: Set(picture),
        category_id: Set(category_id),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Serde helper keeping the blob readable in JSON instead of an integer array.
mod picture_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}
