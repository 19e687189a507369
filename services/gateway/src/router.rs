use crate::handlers::{buyer, quotes, seller};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/buyers", post(buyer::submit_buy_order))
        .route("/buyers/:id", get(buyer::get_buy_order))
        .route("/sellers", post(seller::submit_sell_offer))
        .route("/quotes", get(quotes::list_quotes));

    Router::new()
        .nest("/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use fulfillment::{FulfillmentProvider, ProviderError};
    use http_body_util::BodyExt;
    use ledger::MemoryLedger;
    use matching_engine::MatchingEngine;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct EchoProvider;

    #[async_trait]
    impl FulfillmentProvider for EchoProvider {
        async fn generate(&self, prompt: &str, _max_tokens: u64) -> Result<String, ProviderError> {
            Ok(format!("output for {prompt}"))
        }
    }

    fn test_router() -> Router {
        let store = Arc::new(MemoryLedger::new());
        let engine = Arc::new(MatchingEngine::new(store, Arc::new(EchoProvider)));
        create_router(AppState::new(engine))
    }

    async fn request(router: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_submit_and_fetch_buy_order() {
        let router = test_router();

        let (status, order) = request(
            &router,
            "POST",
            "/v1/buyers",
            json!({"id": "new", "bid": "3", "demand": 20, "prompt": "hello"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(order["status"]["state"], "PENDING");

        let id = order["id"].as_str().unwrap();
        let (status, fetched) = request(&router, "GET", &format!("/v1/buyers/{id}"), Value::Null)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["id"], order["id"]);
    }

    #[tokio::test]
    async fn test_seller_settles_pending_buyer_through_api() {
        let router = test_router();

        let (_, order) = request(
            &router,
            "POST",
            "/v1/buyers",
            json!({"id": "new", "bid": "3", "demand": 20, "prompt": "hello"}),
        )
        .await;

        let (status, offer) = request(
            &router,
            "POST",
            "/v1/sellers",
            json!({"id": "new", "ask": "2", "capacity": 100, "min_order_size": 10}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(offer["capacity"], 80);

        let id = order["id"].as_str().unwrap();
        let (_, settled) = request(&router, "GET", &format!("/v1/buyers/{id}"), Value::Null).await;
        assert_eq!(settled["status"]["state"], "SETTLED");
        assert_eq!(settled["status"]["detail"]["output"], "output for hello");

        let (status, quotes) = request(&router, "GET", "/v1/quotes", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(quotes[0]["capacity"], 80);
        assert!(quotes[0].get("balance").is_none(), "quotes omit private fields");
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request() {
        let router = test_router();

        let (status, body) = request(
            &router,
            "POST",
            "/v1/buyers",
            json!({"id": "new", "bid": "0", "demand": 20, "prompt": "x"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BAD_REQUEST");
        assert_eq!(body["message"], "Bid must be greater than 0");
    }

    #[tokio::test]
    async fn test_unknown_buyer_maps_to_not_found() {
        let router = test_router();

        let id = types::ids::OrderId::new();
        let (status, body) =
            request(&router, "GET", &format!("/v1/buyers/{id}"), Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_ids_map_to_bad_request() {
        let router = test_router();

        let (status, _) = request(&router, "GET", "/v1/buyers/not-a-uuid", Value::Null).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = request(
            &router,
            "POST",
            "/v1/sellers",
            json!({"id": "not-a-uuid", "ask": "2", "capacity": 100}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
