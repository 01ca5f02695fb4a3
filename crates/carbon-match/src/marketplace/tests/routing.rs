use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::marketplace::payloads::NegotiationRequest;
use crate::marketplace::router::{negotiation_handler, reliability_handler};
use crate::marketplace::MarketplaceService;
use crate::scoring::ScoringConfig;

fn post_json(uri: &str, body: serde_json::Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn negotiation_handler_returns_unprocessable_without_vendors() {
    let (service, _) = build_service();

    let response = negotiation_handler::<MemoryLedger>(
        State(Arc::new(service)),
        axum::Json(NegotiationRequest {
            vendors: Vec::new(),
            goals: None,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().is_some());
}

#[tokio::test]
async fn reliability_handler_returns_not_found_for_unknown_seller() {
    let (service, _) = build_service();

    let response = reliability_handler::<MemoryLedger>(
        State(Arc::new(service)),
        axum::extract::Path("ghost".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reliability_handler_returns_internal_error_when_ledger_fails() {
    let service = MarketplaceService::new(Arc::new(UnavailableLedger), ScoringConfig::default());

    let response = reliability_handler::<UnavailableLedger>(
        State(Arc::new(service)),
        axum::extract::Path("s-1".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn match_route_scores_quote() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/quotes/match",
            json!({
                "request": serde_json::to_value(buyer_request()).unwrap(),
                "quote": serde_json::to_value(quote("q-1", "s-1", 14.0, 5.3)).unwrap(),
                "seller_reliability": 80.0,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["match_score"].as_f64(), Some(91.25));
    assert_eq!(payload["reliability_source"], "seller_record");
}

#[tokio::test]
async fn rank_route_rejects_negative_price() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/quotes/rank",
            json!({
                "request": serde_json::to_value(buyer_request()).unwrap(),
                "quotes": [serde_json::to_value(quote("q-1", "s-1", -3.0, 5.0)).unwrap()],
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("quotes[0].price"));
}

#[tokio::test]
async fn transaction_route_then_reliability_route() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/sellers/s-3/transactions",
            json!({ "success": true, "rating": 4.0, "carbon_saved": 10.0 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/sellers/s-3/reliability")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["seller_id"], "s-3");
    assert_eq!(payload["record"]["reliability_score"].as_f64(), Some(15.5));
}

#[tokio::test]
async fn analytics_route_returns_snapshot() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/analytics/score",
            json!({
                "quantity_purchased": 50.0,
                "green_credits": 500.0,
                "reliability_score": 80.0,
                "total_transactions": 5,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["overall_score"], 58);
    assert_eq!(payload["breakdown"]["reliability_score"], 80);
}
