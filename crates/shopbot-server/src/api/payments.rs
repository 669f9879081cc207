use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use shopbot_core::{Payment, PaymentRequest};

use crate::middleware::RequestId;

use super::{map_json_rejection, ApiError, ApiResponse, AppState};

pub(super) async fn list_payments(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<Payment>>> {
    Json(ApiResponse::new(state.store.payments().await, req_id.0))
}

pub(super) async fn create_payment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Payment>>), ApiError> {
    let Json(request) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;

    if let Err(fields) = request.validate() {
        tracing::info!(rejected = fields.len(), "payment rejected");
        return Err(ApiError::validation(
            req_id.0,
            "payment request is invalid",
            fields,
        ));
    }

    let payment = state.store.record_payment(request).await;
    tracing::info!(payment_id = payment.id, amount = %payment.amount, "payment completed");
    Ok((StatusCode::CREATED, Json(ApiResponse::new(payment, req_id.0))))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::super::test_support::{get, json_body, post_json, send, shop_app};

    fn valid_payment() -> serde_json::Value {
        json!({
            "amount": 399.99,
            "cardNumber": "1234 5678 9012 3456",
            "cardHolder": "Jan Kowalski",
            "expiryDate": "12/29",
            "cvv": "123"
        })
    }

    #[tokio::test]
    async fn valid_payment_is_stored_masked_and_clears_cart() {
        let app = shop_app();
        send(&app, post_json("/cart", &json!({ "productId": 3 }))).await;

        let response = send(&app, post_json("/payments", &valid_payment())).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["data"]["status"], "completed");
        assert_eq!(json["data"]["cardNumber"], "**** **** **** 3456");
        assert!(json["data"].get("cvv").is_none());

        let cart = json_body(send(&app, get("/cart")).await).await;
        assert_eq!(cart["data"], json!([]));

        let history = json_body(send(&app, get("/payments")).await).await;
        assert_eq!(history["data"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn invalid_fields_are_listed() {
        let app = shop_app();
        let mut body = valid_payment();
        body["cardNumber"] = json!("1234");
        body["expiryDate"] = json!("13/29");
        body["amount"] = json!(0);

        let response = send(&app, post_json("/payments", &body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
        let fields: Vec<&str> = json["error"]["details"]
            .as_array()
            .expect("details")
            .iter()
            .filter_map(|d| d["field"].as_str())
            .collect();
        assert_eq!(fields, vec!["cardNumber", "expiryDate", "amount"]);
    }

    #[tokio::test]
    async fn rejected_payment_keeps_cart() {
        let app = shop_app();
        send(&app, post_json("/cart", &json!({ "productId": 1 }))).await;

        let mut body = valid_payment();
        body["cvv"] = json!("");
        let response = send(&app, post_json("/payments", &body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let cart = json_body(send(&app, get("/cart")).await).await;
        assert_eq!(cart["data"].as_array().map(Vec::len), Some(1));
    }
}
