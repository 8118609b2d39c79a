use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use prospere_core::{
    investments::{Investment, MonthlyReturn, NewInvestment, NewMonthlyReturn},
    valuation::InvestmentValuation,
};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewReturnBody {
    month: String,
    return_percentage: Decimal,
    #[serde(default)]
    applied: bool,
}

#[derive(Debug, Deserialize)]
struct AppliedBody {
    applied: bool,
}

async fn create_investment(
    State(state): State<Arc<AppState>>,
    Json(investment): Json<NewInvestment>,
) -> ApiResult<(StatusCode, Json<Investment>)> {
    let created = state.investment_service.create_investment(investment).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_investment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Investment>> {
    Ok(Json(state.investment_service.get_investment(&id)?))
}

async fn list_investor_investments(
    Path(investor_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Investment>>> {
    let investments = state
        .investment_service
        .list_investor_investments(&investor_id)?;
    Ok(Json(investments))
}

async fn list_returns(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<MonthlyReturn>>> {
    Ok(Json(state.investment_service.list_monthly_returns(&id)?))
}

async fn add_return(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewReturnBody>,
) -> ApiResult<(StatusCode, Json<MonthlyReturn>)> {
    let new_return = NewMonthlyReturn {
        investment_id: id,
        month: body.month,
        return_percentage: body.return_percentage,
        applied: body.applied,
    };
    let stored = state.investment_service.add_monthly_return(new_return).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn set_return_applied(
    Path((id, month)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<AppliedBody>,
) -> ApiResult<Json<MonthlyReturn>> {
    let updated = state
        .investment_service
        .set_return_applied(&id, &month, body.applied)
        .await?;
    Ok(Json(updated))
}

async fn get_valuation(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<InvestmentValuation>> {
    Ok(Json(state.investment_service.get_valuation(&id)?))
}

async fn close_investment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Investment>> {
    Ok(Json(state.investment_service.close_investment(&id).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/investments", post(create_investment))
        .route("/investments/{id}", get(get_investment))
        .route(
            "/investors/{investor_id}/investments",
            get(list_investor_investments),
        )
        .route("/investments/{id}/returns", get(list_returns).post(add_return))
        .route("/investments/{id}/returns/{month}", put(set_return_applied))
        .route("/investments/{id}/valuation", get(get_valuation))
        .route("/investments/{id}/close", post(close_investment))
}
