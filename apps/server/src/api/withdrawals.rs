use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use prospere_core::withdrawals::{NewWithdrawal, WithdrawalRequest};

async fn request_withdrawal(
    State(state): State<Arc<AppState>>,
    Json(withdrawal): Json<NewWithdrawal>,
) -> ApiResult<(StatusCode, Json<WithdrawalRequest>)> {
    let scheduled = state
        .withdrawal_service
        .request_withdrawal(withdrawal)
        .await?;
    Ok((StatusCode::CREATED, Json(scheduled)))
}

async fn list_withdrawals(
    Path(investment_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<WithdrawalRequest>>> {
    Ok(Json(
        state.withdrawal_service.list_withdrawals(&investment_id)?,
    ))
}

async fn cancel_withdrawal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<WithdrawalRequest>> {
    Ok(Json(state.withdrawal_service.cancel_withdrawal(&id).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/withdrawals", post(request_withdrawal))
        .route("/withdrawals/{id}", delete(cancel_withdrawal))
        .route("/investments/{id}/withdrawals", get(list_withdrawals))
}
