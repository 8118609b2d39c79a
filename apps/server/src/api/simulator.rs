use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{routing::post, Json, Router};
use prospere_core::projection::{generate_projection_set, ProjectionInput, ProjectionSet};

async fn project(Json(input): Json<ProjectionInput>) -> ApiResult<Json<ProjectionSet>> {
    input.validate()?;
    Ok(Json(generate_projection_set(&input)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/simulator/projection", post(project))
}
