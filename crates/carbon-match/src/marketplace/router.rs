use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::ledger::SellerLedger;
use super::payloads::{MatchQuoteRequest, NegotiationRequest, RankQuotesRequest};
use super::service::{MarketplaceError, MarketplaceService};
use crate::scoring::reliability::TransactionOutcome;
use crate::scoring::{SellerId, UserTotals};

/// Router exposing the scoring engine to the surrounding application.
pub fn marketplace_router<L>(service: Arc<MarketplaceService<L>>) -> Router
where
    L: SellerLedger + 'static,
{
    Router::new()
        .route("/api/v1/quotes/match", post(match_handler::<L>))
        .route("/api/v1/quotes/rank", post(rank_handler::<L>))
        .route("/api/v1/negotiations", post(negotiation_handler::<L>))
        .route(
            "/api/v1/sellers/:seller_id/transactions",
            post(transaction_handler::<L>),
        )
        .route(
            "/api/v1/sellers/:seller_id/reliability",
            get(reliability_handler::<L>),
        )
        .route("/api/v1/analytics/score", post(analytics_handler::<L>))
        .with_state(service)
}

pub(crate) async fn match_handler<L>(
    State(service): State<Arc<MarketplaceService<L>>>,
    Json(payload): Json<MatchQuoteRequest>,
) -> Response
where
    L: SellerLedger + 'static,
{
    match service.match_quote(payload) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn rank_handler<L>(
    State(service): State<Arc<MarketplaceService<L>>>,
    Json(payload): Json<RankQuotesRequest>,
) -> Response
where
    L: SellerLedger + 'static,
{
    match service.rank_quotes(payload) {
        Ok(ranked) => (StatusCode::OK, Json(ranked)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn negotiation_handler<L>(
    State(service): State<Arc<MarketplaceService<L>>>,
    Json(payload): Json<NegotiationRequest>,
) -> Response
where
    L: SellerLedger + 'static,
{
    match service.negotiate(payload) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn transaction_handler<L>(
    State(service): State<Arc<MarketplaceService<L>>>,
    Path(seller_id): Path<String>,
    Json(outcome): Json<TransactionOutcome>,
) -> Response
where
    L: SellerLedger + 'static,
{
    match service.record_transaction(&SellerId(seller_id), outcome) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reliability_handler<L>(
    State(service): State<Arc<MarketplaceService<L>>>,
    Path(seller_id): Path<String>,
) -> Response
where
    L: SellerLedger + 'static,
{
    match service.reliability(&SellerId(seller_id)) {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn analytics_handler<L>(
    State(service): State<Arc<MarketplaceService<L>>>,
    Json(totals): Json<UserTotals>,
) -> Response
where
    L: SellerLedger + 'static,
{
    match service.analytics(totals) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: MarketplaceError) -> Response {
    let status = match &err {
        MarketplaceError::Validation(_) | MarketplaceError::Negotiation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        MarketplaceError::UnknownSeller(_) => StatusCode::NOT_FOUND,
        MarketplaceError::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, Json(payload)).into_response()
}
