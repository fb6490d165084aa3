/// Data listing endpoints
///
/// Each endpoint returns the unfiltered, unpaginated contents of one
/// metric table. No sorting or filtering parameters exist; this is a
/// direct read-through.
///
/// # Endpoints
///
/// - `GET /data/productivity`
/// - `GET /data/sales`
/// - `GET /data/reports`

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use metrica_shared::models::metrics::{Productivity, Report, Sale};

/// Lists every productivity row
pub async fn get_productivity(State(state): State<AppState>) -> ApiResult<Json<Vec<Productivity>>> {
    let rows = Productivity::list(&state.db).await?;
    Ok(Json(rows))
}

/// Lists every sale row
pub async fn get_sales(State(state): State<AppState>) -> ApiResult<Json<Vec<Sale>>> {
    let rows = Sale::list(&state.db).await?;
    Ok(Json(rows))
}

/// Lists every report row
pub async fn get_reports(State(state): State<AppState>) -> ApiResult<Json<Vec<Report>>> {
    let rows = Report::list(&state.db).await?;
    Ok(Json(rows))
}
