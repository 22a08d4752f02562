use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::engine::ViewState;
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct DraftParams {
    text: String,
}

#[derive(Serialize, Deserialize)]
pub struct CheckInParams {
    text: Option<String>,
}

pub async fn state(Extension(api): Extension<DynAPI>) -> Result<Json<ViewState>, Error> {
    let state = api.view_state().await?;

    Ok(state.into())
}

pub async fn draft(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<DraftParams>,
) -> Result<Json<ViewState>, Error> {
    let state = api.set_draft(params.text).await?;

    Ok(state.into())
}

pub async fn check_in(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CheckInParams>,
) -> Result<Json<ViewState>, Error> {
    if let Some(text) = params.text {
        api.set_draft(text).await?;
    }

    let state = api.check_in().await?;

    Ok(state.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<ViewState>, Error> {
    let state = api.delete_note(id).await?;

    Ok(state.into())
}

pub async fn focus(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<ViewState>, Error> {
    let state = api.focus_note(id).await?;

    Ok(state.into())
}
