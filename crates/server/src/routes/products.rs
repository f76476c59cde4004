use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use service::{export, product_service};
use tracing::{error, info};

use crate::errors::JsonApiError;
use crate::response::ProductResponse;
use crate::routes::categories::{ListQuery, XLSX_CONTENT_TYPE};
use crate::routes::AppState;

/// Fields of the multipart form used by create and update. The picture part is
/// a file upload; everything else arrives as text.
#[derive(Debug)]
pub(crate) struct ProductForm {
    pub name: Option<String>,
    pub price: Option<i32>,
    pub quantity: Option<i32>,
    pub category_id: Option<i64>,
    pub picture: Option<Vec<u8>>,
}

impl ProductForm {
    pub(crate) async fn read(multipart: &mut Multipart) -> Result<Self, JsonApiError> {
        let mut form = Self {
            name: None,
            price: None,
            quantity: None,
            category_id: None,
            picture: None,
        };
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| JsonApiError::bad_request("Malformed Multipart", e.to_string()))?
        {
            let field_name = field.name().unwrap_or_default().to_string();
            match field_name.as_str() {
                "picture" => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| JsonApiError::bad_request("Malformed Multipart", e.to_string()))?;
                    form.picture = Some(bytes.to_vec());
                }
                "name" => form.name = Some(Self::text(field).await?),
                "price" => form.price = Some(Self::parsed(field, "price").await?),
                "quantity" => form.quantity = Some(Self::parsed(field, "quantity").await?),
                "categoryId" => form.category_id = Some(Self::parsed(field, "categoryId").await?),
                // unknown parts are ignored
                _ => {}
            }
        }
        Ok(form)
    }

    async fn text(field: axum::extract::multipart::Field<'_>) -> Result<String, JsonApiError> {
        field
            .text()
            .await
            .map_err(|e| JsonApiError::bad_request("Malformed Multipart", e.to_string()))
    }

    async fn parsed<T: std::str::FromStr>(
        field: axum::extract::multipart::Field<'_>,
        name: &'static str,
    ) -> Result<T, JsonApiError> {
        let raw = Self::text(field).await?;
        raw.trim()
            .parse::<T>()
            .map_err(|_| JsonApiError::bad_request("Invalid Form Field", format!("{name}: {raw:?}")))
    }

    fn require<T>(value: Option<T>, name: &'static str) -> Result<T, JsonApiError> {
        value.ok_or_else(|| JsonApiError::bad_request("Missing Form Field", name))
    }
}

#[utoipa::path(
    get, path = "/api/v1/products", tag = "products",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> (StatusCode, Json<ProductResponse>) {
    match product_service::list_products(&state.db, q.pagination()).await {
        Ok(rows) => {
            info!(count = rows.len(), "list products");
            (StatusCode::OK, Json(ProductResponse::ok("products listed", rows)))
        }
        Err(e) => {
            error!(err = %e, "list products failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ProductResponse::error(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/api/v1/products/{id}", tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<ProductResponse>) {
    match product_service::get_product(&state.db, id).await {
        Ok(Some(row)) => (StatusCode::OK, Json(ProductResponse::ok("product found", [row]))),
        Ok(None) => (StatusCode::NOT_FOUND, Json(ProductResponse::error("product not found"))),
        Err(e) => {
            error!(err = %e, id, "get product failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ProductResponse::error(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/api/v1/products/filter/{term}", tag = "products",
    params(("term" = String, Path, description = "Substring to match against product names")),
    responses(
        (status = 200, description = "Filter OK"),
        (status = 500, description = "Filter Failed")
    )
)]
pub async fn filter(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> (StatusCode, Json<ProductResponse>) {
    match product_service::filter_products_by_name(&state.db, &term).await {
        Ok(rows) => {
            info!(count = rows.len(), term = %term, "filter products");
            (StatusCode::OK, Json(ProductResponse::ok("products filtered", rows)))
        }
        Err(e) => {
            error!(err = %e, term = %term, "filter products failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ProductResponse::error(e.to_string())))
        }
    }
}

#[utoipa::path(
    post, path = "/api/v1/products", tag = "products",
    responses(
        (status = 200, description = "Saved"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Category Not Found"),
        (status = 500, description = "Save Failed")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ProductResponse>), JsonApiError> {
    let form = ProductForm::read(&mut multipart).await?;
    let name = ProductForm::require(form.name, "name")?;
    let price = ProductForm::require(form.price, "price")?;
    let quantity = ProductForm::require(form.quantity, "quantity")?;
    let category_id = ProductForm::require(form.category_id, "categoryId")?;
    let picture = ProductForm::require(form.picture, "picture")?;

    info!(name = %name, price, quantity, category_id, picture_bytes = picture.len(), "create product request");

    let resp = match product_service::create_product(
        &state.db,
        &name,
        price,
        quantity,
        &picture,
        category_id,
    )
    .await
    {
        Ok((m, cat)) => {
            info!(id = m.id, category_id = m.category_id, "created product");
            (StatusCode::OK, Json(ProductResponse::ok("product saved", [(m, cat)])))
        }
        Err(ServiceError::NotFound(msg)) => {
            (StatusCode::NOT_FOUND, Json(ProductResponse::error(msg)))
        }
        Err(e @ (ServiceError::Validation(_) | ServiceError::Model(_))) => {
            (StatusCode::BAD_REQUEST, Json(ProductResponse::error(e.to_string())))
        }
        Err(e) => {
            error!(err = %e, "create product failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ProductResponse::error(e.to_string())))
        }
    };
    Ok(resp)
}

#[utoipa::path(
    put, path = "/api/v1/products/{id}", tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
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
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ProductResponse>), JsonApiError> {
    let form = ProductForm::read(&mut multipart).await?;

    let resp = match product_service::update_product(
        &state.db,
        id,
        form.name.as_deref(),
        form.price,
        form.quantity,
        form.picture.as_deref(),
        form.category_id,
    )
    .await
    {
        Ok((m, cat)) => {
            info!(id = m.id, "updated product");
            (StatusCode::OK, Json(ProductResponse::ok("product updated", [(m, cat)])))
        }
        Err(ServiceError::NotFound(msg)) => {
            (StatusCode::NOT_FOUND, Json(ProductResponse::error(msg)))
        }
        Err(e @ (ServiceError::Validation(_) | ServiceError::Model(_))) => {
            (StatusCode::BAD_REQUEST, Json(ProductResponse::error(e.to_string())))
        }
        Err(e) => {
            error!(err = %e, id, "update product failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ProductResponse::error(e.to_string())))
        }
    };
    Ok(resp)
}

#[utoipa::path(
    delete, path = "/api/v1/products/{id}", tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<ProductResponse>) {
    match product_service::delete_product(&state.db, id).await {
        Ok(true) => {
            info!(id, "deleted product");
            (StatusCode::OK, Json(ProductResponse::ok("product deleted", Vec::new())))
        }
        Ok(false) => (StatusCode::NOT_FOUND, Json(ProductResponse::error("product not found"))),
        Err(e) => {
            error!(err = %e, id, "delete product failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ProductResponse::error(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/api/v1/products/export/excel", tag = "products",
    responses(
        (status = 200, description = "Workbook attached"),
        (status = 500, description = "Export Failed")
    )
)]
pub async fn export_excel(State(state): State<AppState>) -> Response {
    let rows = match product_service::list_products(&state.db, None).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(err = %e, "export products failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(ProductResponse::error(e.to_string())))
                .into_response();
        }
    };
    match export::products_to_xlsx(&rows) {
        Ok(bytes) => {
            info!(count = rows.len(), "exported products workbook");
            (
                [
                    (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
                    (header::CONTENT_DISPOSITION, "attachment; filename=\"products.xlsx\""),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!(err = %e, "export products failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ProductResponse::error(e.to_string())))
                .into_response()
        }
    }
}
