use utoipa::OpenApi;
use utoipa::ToSchema;

// Doc-only mirrors of the request/response bodies; the real types live next to
// their handlers and stay free of schema derives.

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MetadataDoc {
    pub r#type: String,
    pub code: String,
    pub message: String,
}

#[derive(ToSchema)]
pub struct CategoryDoc {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(ToSchema)]
pub struct ProductDoc {
    pub id: i64,
    pub name: String,
    pub price: i32,
    pub quantity: i32,
    /// base64-encoded image bytes
    pub picture: String,
    pub category_id: i64,
}

#[derive(ToSchema)]
pub struct CreateCategoryInputDoc {
    pub name: String,
    pub description: String,
}

#[derive(ToSchema)]
pub struct UpdateCategoryInputDoc {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::categories::list,
        crate::routes::categories::get,
        crate::routes::categories::create,
        crate::routes::categories::update,
        crate::routes::categories::delete,
        crate::routes::categories::export_excel,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::filter,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::products::export_excel,
    ),
    components(
        schemas(
            HealthResponse,
            MetadataDoc,
            CategoryDoc,
            ProductDoc,
            CreateCategoryInputDoc,
            UpdateCategoryInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "categories"),
        (name = "products"),
    )
)]
pub struct ApiDoc;
