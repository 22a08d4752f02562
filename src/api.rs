use std::sync::Arc;

use async_trait::async_trait;

use crate::engine::ViewState;
use crate::entities::RouteSelection;
use crate::error::Error;
use crate::map::Scene;

#[async_trait]
pub trait NoteAPI {
    async fn view_state(&self) -> Result<ViewState, Error>;
    async fn set_draft(&self, text: String) -> Result<ViewState, Error>;
    async fn check_in(&self) -> Result<ViewState, Error>;
    async fn delete_note(&self, id: String) -> Result<ViewState, Error>;
    async fn focus_note(&self, id: String) -> Result<ViewState, Error>;
}

#[async_trait]
pub trait FilterAPI {
    async fn set_radius(&self, radius_meters: f64) -> Result<ViewState, Error>;
    async fn center_filter_on_current_location(&self) -> Result<ViewState, Error>;
    async fn clear_filter(&self) -> Result<ViewState, Error>;
}

#[async_trait]
pub trait RouteAPI {
    async fn select_route(&self, selection: RouteSelection) -> Result<ViewState, Error>;
    async fn route_between(&self, start_id: String, end_id: String) -> Result<ViewState, Error>;
    async fn route_to_target(
        &self,
        start_id: String,
        lat: String,
        lng: String,
    ) -> Result<ViewState, Error>;
    async fn clear_route(&self) -> Result<ViewState, Error>;
}

#[async_trait]
pub trait MapAPI {
    async fn scene(&self) -> Result<Scene, Error>;
}

pub trait API: NoteAPI + FilterAPI + RouteAPI + MapAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
