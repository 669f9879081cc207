use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use shopbot_core::{OrderReceipt, OrderRequest};

use crate::middleware::RequestId;

use super::{map_json_rejection, ApiError, ApiResponse, AppState};

pub(super) async fn list_orders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<OrderReceipt>>> {
    Json(ApiResponse::new(state.store.orders().await, req_id.0))
}

pub(super) async fn create_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<OrderReceipt>>), ApiError> {
    let Json(order) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;

    if let Err(fields) = order.validate() {
        tracing::info!(rejected = fields.len(), "order rejected");
        return Err(ApiError::validation(req_id.0, "order is invalid", fields));
    }

    let receipt = state.store.record_order(order).await;
    tracing::info!(
        order_id = receipt.id,
        items = receipt.item_count,
        total = %receipt.total,
        "order placed"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::new(receipt, req_id.0))))
}
