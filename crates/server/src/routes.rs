use axum::routing::get;
use axum::{Json, Router};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi;

pub mod categories;
pub mod products;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service alive"))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health, versioned resource routes,
/// Swagger UI, CORS and request tracing.
pub fn build_router(cors: CorsLayer, state: AppState) -> Router {
    let api = Router::new()
        .route("/categories", get(categories::list).post(categories::create))
        .route("/categories/export/excel", get(categories::export_excel))
        .route(
            "/categories/:id",
            get(categories::get).put(categories::update).delete(categories::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route("/products/filter/:term", get(products::filter))
        .route("/products/export/excel", get(products::export_excel))
        .route(
            "/products/:id",
            get(products::get).put(products::update).delete(products::delete),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
