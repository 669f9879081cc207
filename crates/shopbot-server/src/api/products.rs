use std::str::FromStr;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopbot_core::{FieldError, Product, ProductCategory, ProductId, ProductInput};

use crate::middleware::RequestId;
use crate::store::ProductRejection;

use super::{map_json_rejection, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct PriceScope {
    min_price: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedProduct {
    deleted: ProductId,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<Product>>> {
    Json(ApiResponse::new(state.store.products().await, req_id.0))
}

/// `GET /products/scopes?min_price=`: products at or above a price. A
/// missing or blank bound means zero.
pub(super) async fn products_from_price(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(scope): Query<PriceScope>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let min_price = match scope.min_price.as_deref().map(str::trim) {
        None | Some("") => Decimal::ZERO,
        Some(raw) => Decimal::from_str(raw).map_err(|_| {
            ApiError::new(
                req_id.0.clone(),
                "bad_request",
                format!("min_price is not a number: {raw}"),
            )
        })?,
    };
    let products = state.store.products_from_price(min_price).await;
    Ok(Json(ApiResponse::new(products, req_id.0)))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    match state.store.product(product_id).await {
        Some(product) => Ok(Json(ApiResponse::new(product, req_id.0))),
        None => Err(not_found(req_id.0, product_id)),
    }
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    let Json(input) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;
    if let Err(fields) = input.validate() {
        return Err(ApiError::validation(req_id.0, "product is invalid", fields));
    }

    let product = state
        .store
        .create_product(input)
        .await
        .map_err(|r| rejection(req_id.0.clone(), 0, r))?;
    tracing::info!(product_id = product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(ApiResponse::new(product, req_id.0))))
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<ProductId>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let Json(input) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;
    if let Err(fields) = input.validate() {
        return Err(ApiError::validation(req_id.0, "product is invalid", fields));
    }

    let product = state
        .store
        .update_product(product_id, input)
        .await
        .map_err(|r| rejection(req_id.0.clone(), product_id, r))?;
    tracing::info!(product_id, "product updated");
    Ok(Json(ApiResponse::new(product, req_id.0)))
}

pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ApiResponse<DeletedProduct>>, ApiError> {
    if !state.store.delete_product(product_id).await {
        return Err(not_found(req_id.0, product_id));
    }
    tracing::info!(product_id, "product deleted");
    Ok(Json(ApiResponse::new(
        DeletedProduct {
            deleted: product_id,
        },
        req_id.0,
    )))
}

pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<ProductCategory>>> {
    Json(ApiResponse::new(state.store.categories().await, req_id.0))
}

fn not_found(request_id: String, product_id: ProductId) -> ApiError {
    ApiError::new(
        request_id,
        "not_found",
        format!("product {product_id} not found"),
    )
}

fn rejection(request_id: String, product_id: ProductId, reason: ProductRejection) -> ApiError {
    match reason {
        ProductRejection::NotFound => not_found(request_id, product_id),
        ProductRejection::UnknownCategory(id) => ApiError::validation(
            request_id,
            "product is invalid",
            vec![FieldError::new(
                "categoryId",
                format!("category {id} does not exist"),
            )],
        ),
    }
}
