use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use service::errors::ServiceError;
use service::pagination::Pagination;
use service::{category_service, export};
use tracing::{error, info};

use crate::response::CategoryResponse;
use crate::routes::AppState;

pub(crate) const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    pub(crate) fn pagination(&self) -> Option<Pagination> {
        if self.page.is_none() && self.per_page.is_none() {
            return None;
        }
        let d = Pagination::default();
        Some(Pagination {
            page: self.page.unwrap_or(d.page),
            per_page: self.per_page.unwrap_or(d.per_page),
        })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateCategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[utoipa::path(
    get, path = "/api/v1/categories", tag = "categories",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> (StatusCode, Json<CategoryResponse>) {
    match category_service::list_categories(&state.db, q.pagination()).await {
        Ok(rows) => {
            info!(count = rows.len(), "list categories");
            (StatusCode::OK, Json(CategoryResponse::ok("categories listed", rows)))
        }
        Err(e) => {
            error!(err = %e, "list categories failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(CategoryResponse::error(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/api/v1/categories/{id}", tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<CategoryResponse>) {
    match category_service::get_category(&state.db, id).await {
        Ok(Some(m)) => (StatusCode::OK, Json(CategoryResponse::ok("category found", vec![m]))),
        Ok(None) => (StatusCode::NOT_FOUND, Json(CategoryResponse::error("category not found"))),
        Err(e) => {
            error!(err = %e, id, "get category failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(CategoryResponse::error(e.to_string())))
        }
    }
}

#[utoipa::path(
    post, path = "/api/v1/categories", tag = "categories",
    request_body = crate::openapi::CreateCategoryInputDoc,
    responses(
        (status = 200, description = "Saved"),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Save Failed")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> (StatusCode, Json<CategoryResponse>) {
    match category_service::create_category(&state.db, &input.name, &input.description).await {
        Ok(m) => {
            info!(id = m.id, name = %m.name, "created category");
            (StatusCode::OK, Json(CategoryResponse::ok("category saved", vec![m])))
        }
        Err(e @ (ServiceError::Validation(_) | ServiceError::Model(_))) => {
            (StatusCode::BAD_REQUEST, Json(CategoryResponse::error(e.to_string())))
        }
        Err(e) => {
            error!(err = %e, "create category failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(CategoryResponse::error(e.to_string())))
        }
    }
}

#[utoipa::path(
    put, path = "/api/v1/categories/{id}", tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = crate::openapi::UpdateCategoryInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateCategoryInput>,
) -> (StatusCode, Json<CategoryResponse>) {
    match category_service::update_category(
        &state.db,
        id,
        input.name.as_deref(),
        input.description.as_deref(),
    )
    .await
    {
        Ok(m) => {
            info!(id = m.id, "updated category");
            (StatusCode::OK, Json(CategoryResponse::ok("category updated", vec![m])))
        }
        Err(ServiceError::NotFound(msg)) => {
            (StatusCode::NOT_FOUND, Json(CategoryResponse::error(msg)))
        }
        Err(e @ (ServiceError::Validation(_) | ServiceError::Model(_))) => {
            (StatusCode::BAD_REQUEST, Json(CategoryResponse::error(e.to_string())))
        }
        Err(e) => {
            error!(err = %e, id, "update category failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(CategoryResponse::error(e.to_string())))
        }
    }
}

#[utoipa::path(
    delete, path = "/api/v1/categories/{id}", tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<CategoryResponse>) {
    match category_service::delete_category(&state.db, id).await {
        Ok(true) => {
            info!(id, "deleted category");
            (StatusCode::OK, Json(CategoryResponse::ok("category deleted", Vec::new())))
        }
        Ok(false) => (StatusCode::NOT_FOUND, Json(CategoryResponse::error("category not found"))),
        Err(e) => {
            error!(err = %e, id, "delete category failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(CategoryResponse::error(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/api/v1/categories/export/excel", tag = "categories",
    responses(
        (status = 200, description = "Workbook attached"),
        (status = 500, description = "Export Failed")
    )
)]
pub async fn export_excel(State(state): State<AppState>) -> Response {
    let rows = match category_service::list_categories(&state.db, None).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(err = %e, "export categories failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(CategoryResponse::error(e.to_string())))
                .into_response();
        }
    };
    match export::categories_to_xlsx(&rows) {
        Ok(bytes) => {
            info!(count = rows.len(), "exported categories workbook");
            (
                [
                    (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
                    (header::CONTENT_DISPOSITION, "attachment; filename=\"categories.xlsx\""),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!(err = %e, "export categories failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(CategoryResponse::error(e.to_string())))
                .into_response()
        }
    }
}
