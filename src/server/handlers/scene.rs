use axum::extract::{Extension, Json};

use crate::api::DynAPI;
use crate::error::Error;
use crate::map::Scene;

pub async fn find(Extension(api): Extension<DynAPI>) -> Result<Json<Scene>, Error> {
    let scene = api.scene().await?;

    Ok(scene.into())
}
