use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::engine::ViewState;
use crate::entities::RouteSelection;
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct BetweenParams {
    start_id: String,
    end_id: String,
}

#[derive(Serialize, Deserialize)]
pub struct TargetParams {
    start_id: String,
    lat: String,
    lng: String,
}

pub async fn select(
    Extension(api): Extension<DynAPI>,
    Json(selection): Json<RouteSelection>,
) -> Result<Json<ViewState>, Error> {
    let state = api.select_route(selection).await?;

    Ok(state.into())
}

pub async fn between(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<BetweenParams>,
) -> Result<Json<ViewState>, Error> {
    let state = api.route_between(params.start_id, params.end_id).await?;

    Ok(state.into())
}

pub async fn target(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<TargetParams>,
) -> Result<Json<ViewState>, Error> {
    let state = api
        .route_to_target(params.start_id, params.lat, params.lng)
        .await?;

    Ok(state.into())
}

pub async fn clear(Extension(api): Extension<DynAPI>) -> Result<Json<ViewState>, Error> {
    let state = api.clear_route().await?;

    Ok(state.into())
}
