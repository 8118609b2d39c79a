use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use prospere_core::pix::{PixSession, PixSessionSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const DEFAULT_DESCRIPTION: &str = "Prospere Capital deposit";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewPixDeposit {
    amount: Decimal,
    #[serde(default)]
    description: Option<String>,
}

/// Session state plus the `MM:SS` countdown the deposit screen shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PixDepositView {
    #[serde(flatten)]
    snapshot: PixSessionSnapshot,
    countdown: String,
}

impl From<&PixSession> for PixDepositView {
    fn from(session: &PixSession) -> Self {
        Self {
            snapshot: session.snapshot(),
            countdown: session.expiry_countdown(),
        }
    }
}

async fn create_pix_deposit(
    State(state): State<Arc<AppState>>,
    Json(deposit): Json<NewPixDeposit>,
) -> ApiResult<(StatusCode, Json<PixDepositView>)> {
    let description = deposit
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    let session = PixSession::start(
        state.pix_gateway.clone(),
        deposit.amount,
        description,
        state.settlement_sink.clone(),
        state.pix_session_config,
    )
    .await?;

    let session = state.pix_sessions.insert(session);
    Ok((
        StatusCode::CREATED,
        Json(PixDepositView::from(session.as_ref())),
    ))
}

async fn get_pix_deposit(
    Path(transaction_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PixDepositView>> {
    let session = state
        .pix_sessions
        .get(&transaction_id)
        .ok_or(ApiError::NotFound)?;
    Ok(Json(PixDepositView::from(session.as_ref())))
}

/// Cancels a pending deposit. A session that already finished is returned
/// unchanged.
async fn cancel_pix_deposit(
    Path(transaction_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PixDepositView>> {
    let session = state
        .pix_sessions
        .get(&transaction_id)
        .ok_or(ApiError::NotFound)?;
    session.cancel();
    Ok(Json(PixDepositView::from(session.as_ref())))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/deposits/pix", post(create_pix_deposit))
        .route(
            "/deposits/pix/{transaction_id}",
            get(get_pix_deposit).delete(cancel_pix_deposit),
        )
}
