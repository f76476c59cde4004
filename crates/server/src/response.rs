//! Response envelope returned by every resource endpoint.
//!
//! Each reply carries a metadata block (outcome kind, application code,
//! human-readable message) next to the payload list, also on errors.

use models::{category, product};
use serde::{Deserialize, Serialize};

pub const CODE_OK: &str = "00";
pub const CODE_ERROR: &str = "-1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "type")]
    pub kind: String,
    pub code: String,
    pub message: String,
}

impl Metadata {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { kind: "ok".into(), code: CODE_OK.into(), message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: "error".into(), code: CODE_ERROR.into(), message: message.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub metadata: Vec<Metadata>,
    pub categories: Vec<category::Model>,
}

impl CategoryResponse {
    pub fn ok(message: impl Into<String>, categories: Vec<category::Model>) -> Self {
        Self { metadata: vec![Metadata::ok(message)], categories }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { metadata: vec![Metadata::error(message)], categories: Vec::new() }
    }
}

/// A product with its category inlined, as the clients expect it.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductPayload {
    #[serde(flatten)]
    pub product: product::Model,
    pub category: Option<category::Model>,
}

impl From<service::product_service::ProductWithCategory> for ProductPayload {
    fn from((product, category): service::product_service::ProductWithCategory) -> Self {
        Self { product, category }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductResponse {
    pub metadata: Vec<Metadata>,
    pub products: Vec<ProductPayload>,
}

impl ProductResponse {
    pub fn ok(
        message: impl Into<String>,
        products: impl IntoIterator<Item = service::product_service::ProductWithCategory>,
    ) -> Self {
        Self {
            metadata: vec![Metadata::ok(message)],
            products: products.into_iter().map(ProductPayload::from).collect(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { metadata: vec![Metadata::error(message)], products: Vec::new() }
    }
}
