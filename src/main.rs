use std::sync::Arc;

use geonotes::app::App;
use geonotes::config::Config;
use geonotes::engine::Event;
use geonotes::location::{DynLocation, FixedLocation, PositionReporter, ReportedLocation};
use geonotes::map::Scene;
use geonotes::server::serve;
use geonotes::store::{DynStore, FileStore, NoteStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("configuration error: {}", err);
            std::process::exit(1);
        }
    };

    let store = NoteStore::open(Box::new(FileStore::new(&config.data_dir)) as DynStore);
    tracing::info!(
        "loaded {} notes from {}",
        store.notes().len(),
        config.data_dir.display()
    );

    let (location, reporter): (DynLocation, Option<PositionReporter>) = match config.fixed_position
    {
        Some(position) => (Arc::new(FixedLocation::new(position)), None),
        None => {
            let (provider, reporter) = ReportedLocation::new();
            (Arc::new(provider), Some(reporter))
        }
    };

    let app = App::new(
        store,
        Scene::new(config.map.clone()),
        location,
        config.location_timeout,
    );

    let starter = app.clone();
    tokio::spawn(async move {
        starter.dispatch(Event::Started).await;
    });

    serve(app, reporter, config.addr).await;
}
