mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{delete, get, post, put},
    Router,
};

use crate::api::{DynAPI, API};
use crate::location::PositionReporter;
use crate::server::handlers::{filter, notes, position, routes, scene};

pub fn router(api: DynAPI, reporter: Option<PositionReporter>) -> Router {
    Router::new()
        .route("/state", get(notes::state))
        .route("/draft", put(notes::draft))
        .route("/checkin", post(notes::check_in))
        .route("/notes/:id", delete(notes::delete))
        .route("/notes/:id/focus", post(notes::focus))
        .route("/filter", delete(filter::clear))
        .route("/filter/radius", put(filter::radius))
        .route("/filter/center", post(filter::center))
        .route("/routes", delete(routes::clear))
        .route("/routes/selection", put(routes::select))
        .route("/routes/between", post(routes::between))
        .route("/routes/target", post(routes::target))
        .route("/scene", get(scene::find))
        .route("/position", post(position::report))
        .layer(Extension(api))
        .layer(Extension(reporter))
}

pub async fn serve<T: API + Sync + Send + 'static>(
    api: T,
    reporter: Option<PositionReporter>,
    addr: SocketAddr,
) {
    let api = Arc::new(api) as DynAPI;
    let app = router(api, reporter);

    tracing::info!("listening on {}", addr);

    if let Err(err) = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!("server stopped: {}", err);
    }
}
