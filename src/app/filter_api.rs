use async_trait::async_trait;

use super::App;
use crate::api::FilterAPI;
use crate::engine::{Event, ViewState};
use crate::error::{invalid_input_error, Error};
use crate::map::Scene;

#[async_trait]
impl FilterAPI for App<Scene> {
    #[tracing::instrument(skip(self))]
    async fn set_radius(&self, radius_meters: f64) -> Result<ViewState, Error> {
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Err(invalid_input_error());
        }

        Ok(self.dispatch(Event::SetRadius(radius_meters)).await)
    }

    #[tracing::instrument(skip(self))]
    async fn center_filter_on_current_location(&self) -> Result<ViewState, Error> {
        Ok(self.dispatch(Event::SetFilterCenterToCurrent).await)
    }

    async fn clear_filter(&self) -> Result<ViewState, Error> {
        Ok(self.dispatch(Event::ClearFilter).await)
    }
}

#[test]
fn negative_radius_is_rejected() {
    use crate::store::MemoryStore;
    use tokio_test::block_on;

    let app = super::test_app(MemoryStore::new(), None);

    assert_eq!(block_on(app.set_radius(-1.0)).unwrap_err().code, 101);
    assert_eq!(block_on(app.set_radius(f64::INFINITY)).unwrap_err().code, 101);
    assert_eq!(block_on(app.set_radius(25.0)).unwrap().filter.radius_meters, 25.0);
}

#[test]
fn filter_shows_only_nearby_markers() {
    use crate::api::NoteAPI;
    use crate::entities::{Coordinates, FilterState, Position};
    use crate::map::Primitive;
    use crate::store::{MemoryStore, STORAGE_KEY};
    use tokio_test::block_on;

    let payload = r#"[
        {"id":"a","text":"A","lat":0.0,"lng":0.0,"ts":1},
        {"id":"b","text":"B","lat":0.0,"lng":1.0,"ts":2}
    ]"#;
    let app = super::test_app(
        MemoryStore::with_entry(STORAGE_KEY, payload),
        Some(Position {
            latitude: 0.0,
            longitude: 0.0,
        }),
    );

    block_on(async {
        app.set_radius(50_000.0).await.unwrap();
        let state = app.center_filter_on_current_location().await.unwrap();
        assert_eq!(state.filter.center, Some(Coordinates::new(0.0, 0.0)));
        assert_eq!(state.status.as_deref(), Some("Filter center set"));

        let layer = app.with_map(|m| m.notes.clone()).await;
        let markers = layer
            .iter()
            .filter(|p| matches!(p, Primitive::Marker { .. }))
            .count();
        let circles = layer
            .iter()
            .filter(|p| matches!(p, Primitive::Circle { .. }))
            .count();
        assert_eq!((markers, circles), (1, 1));

        app.set_radius(200_000.0).await.unwrap();
        let layer = app.with_map(|m| m.notes.clone()).await;
        assert_eq!(layer.len(), 4);

        let state = app.clear_filter().await.unwrap();
        assert_eq!(state.filter, FilterState::default());
        assert_eq!(app.view_state().await.unwrap().notes.len(), 2);
    });
}
