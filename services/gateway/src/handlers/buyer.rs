use crate::error::AppError;
use crate::models::SubmitBuyOrderRequest;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use types::buyer::BuyOrder;
use types::ids::OrderId;
use uuid::Uuid;

/// POST /v1/buyers
///
/// Creates or additively updates a buy order, runs one matching attempt,
/// and returns the resulting record.
pub async fn submit_buy_order(
    State(state): State<AppState>,
    Json(payload): Json<SubmitBuyOrderRequest>,
) -> Result<Json<BuyOrder>, AppError> {
    let submission = payload.into_submission()?;
    let order = state.engine.submit_buy_order(submission).await?;
    Ok(Json(order))
}

/// GET /v1/buyers/:id
pub async fn get_buy_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BuyOrder>, AppError> {
    let id = id
        .parse::<Uuid>()
        .map(OrderId::from_uuid)
        .map_err(|_| AppError::BadRequest(format!("Invalid buyer ID: {id}")))?;
    let order = state.engine.get_buy_order(id).await?;
    Ok(Json(order))
}
