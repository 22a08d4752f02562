use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::engine::ViewState;
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct RadiusParams {
    radius_meters: f64,
}

pub async fn radius(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<RadiusParams>,
) -> Result<Json<ViewState>, Error> {
    let state = api.set_radius(params.radius_meters).await?;

    Ok(state.into())
}

pub async fn center(Extension(api): Extension<DynAPI>) -> Result<Json<ViewState>, Error> {
    let state = api.center_filter_on_current_location().await?;

    Ok(state.into())
}

pub async fn clear(Extension(api): Extension<DynAPI>) -> Result<Json<ViewState>, Error> {
    let state = api.clear_filter().await?;

    Ok(state.into())
}
