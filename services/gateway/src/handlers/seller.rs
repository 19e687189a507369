use crate::error::AppError;
use crate::models::SubmitSellOfferRequest;
use crate::state::AppState;
use axum::{extract::State, Json};
use types::seller::SellOffer;

/// POST /v1/sellers
///
/// Creates or additively updates a sell offer, then settles matches
/// against it until capacity or candidates run out.
pub async fn submit_sell_offer(
    State(state): State<AppState>,
    Json(payload): Json<SubmitSellOfferRequest>,
) -> Result<Json<SellOffer>, AppError> {
    let submission = payload.into_submission()?;
    let offer = state.engine.submit_sell_offer(submission).await?;
    Ok(Json(offer))
}
