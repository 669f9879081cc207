use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use shopbot_core::{CartItemRecord, NewCartItem};

use crate::middleware::RequestId;

use super::{map_json_rejection, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ClearedCart {
    removed: u64,
}

pub(super) async fn list_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CartItemRecord>>> {
    Json(ApiResponse::new(state.store.cart().await, req_id.0))
}

pub(super) async fn add_cart_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<NewCartItem>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CartItemRecord>>), ApiError> {
    let Json(item) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;

    if item.quantity == 0 {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "quantity must be at least 1",
        ));
    }

    let Some(record) = state.store.add_cart_item(&item).await else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("product {} not found", item.product_id),
        ));
    };

    tracing::info!(
        cart_item_id = record.id,
        product_id = record.product_id,
        quantity = record.quantity,
        "cart line added"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::new(record, req_id.0))))
}

pub(super) async fn clear_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ClearedCart>> {
    let removed = state.store.clear_cart().await;
    tracing::info!(removed, "cart cleared");
    Json(ApiResponse::new(ClearedCart { removed }, req_id.0))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    use super::super::test_support::{get, json_body, post_json, send, shop_app};

    #[tokio::test]
    async fn add_cart_item_defaults_quantity_and_embeds_product() {
        let app = shop_app();
        let response = send(&app, post_json("/cart", &json!({ "productId": 2 }))).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["data"]["id"], 1);
        assert_eq!(json["data"]["productId"], 2);
        assert_eq!(json["data"]["quantity"], 1);
        assert_eq!(json["data"]["product"]["name"], "Smartphone");

        let listed = json_body(send(&app, get("/cart")).await).await;
        assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn add_unknown_product_is_404() {
        let app = shop_app();
        let response = send(&app, post_json("/cart", &json!({ "productId": 42 }))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn zero_quantity_is_bad_request() {
        let app = shop_app();
        let response = send(
            &app,
            post_json("/cart", &json!({ "productId": 1, "quantity": 0 })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let app = shop_app();
        let response = send(&app, post_json("/cart", &json!({ "productId": "laptop" }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_cart_reports_removed_lines() {
        let app = shop_app();
        send(&app, post_json("/cart", &json!({ "productId": 1 }))).await;
        send(&app, post_json("/cart", &json!({ "productId": 3 }))).await;

        let response = send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri("/cart")
                .body(Body::empty())
                .expect("request"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["removed"], 2);

        let listed = json_body(send(&app, get("/cart")).await).await;
        assert_eq!(listed["data"], json!([]));
    }
}
