use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use types::seller::Quote;

/// GET /v1/quotes
///
/// Public projection of the sell side: ask, remaining capacity, and floor
/// per offer. Ids and balances stay private.
pub async fn list_quotes(State(state): State<AppState>) -> Result<Json<Vec<Quote>>, AppError> {
    let quotes = state.engine.list_quotes().await?;
    Ok(Json(quotes))
}
