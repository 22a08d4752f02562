use async_trait::async_trait;

use super::App;
use crate::api::RouteAPI;
use crate::engine::{Event, ViewState};
use crate::entities::RouteSelection;
use crate::error::Error;
use crate::map::Scene;

#[async_trait]
impl RouteAPI for App<Scene> {
    async fn select_route(&self, selection: RouteSelection) -> Result<ViewState, Error> {
        Ok(self
            .dispatch_all(vec![
                Event::SelectRouteStart(selection.start_id),
                Event::SelectRouteEnd(selection.end_id),
                Event::SetTargetLat(selection.target_lat),
                Event::SetTargetLng(selection.target_lng),
            ])
            .await)
    }

    #[tracing::instrument(skip(self))]
    async fn route_between(&self, start_id: String, end_id: String) -> Result<ViewState, Error> {
        Ok(self
            .dispatch_all(vec![
                Event::SelectRouteStart(start_id),
                Event::SelectRouteEnd(end_id),
                Event::DrawRouteBetween,
            ])
            .await)
    }

    #[tracing::instrument(skip(self))]
    async fn route_to_target(
        &self,
        start_id: String,
        lat: String,
        lng: String,
    ) -> Result<ViewState, Error> {
        Ok(self
            .dispatch_all(vec![
                Event::SelectRouteStart(start_id),
                Event::SetTargetLat(lat),
                Event::SetTargetLng(lng),
                Event::DrawRouteToTarget,
            ])
            .await)
    }

    async fn clear_route(&self) -> Result<ViewState, Error> {
        Ok(self.dispatch(Event::ClearRoute).await)
    }
}

#[test]
fn route_layer_follows_requests() {
    use crate::entities::Coordinates;
    use crate::map::{Primitive, Viewport};
    use crate::store::{MemoryStore, STORAGE_KEY};
    use tokio_test::block_on;

    let payload = r#"[
        {"id":"a","text":"A","lat":0.0,"lng":0.0,"ts":1},
        {"id":"b","text":"B","lat":0.0,"lng":1.0,"ts":2}
    ]"#;
    let app = super::test_app(MemoryStore::with_entry(STORAGE_KEY, payload), None);

    block_on(async {
        let state = app.route_between("a".into(), "b".into()).await.unwrap();
        assert!(state.route.is_some());

        let (route, viewport) = app.with_map(|m| (m.route.clone(), m.viewport.clone())).await;
        match &route[..] {
            [Primitive::Polyline { points, .. }] => assert_eq!(
                points,
                &vec![Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0)]
            ),
            other => panic!("unexpected route layer {:?}", other),
        }
        assert!(matches!(viewport, Viewport::Bounds { padding: [50, 50], .. }));

        let state = app
            .route_to_target("a".into(), "x".into(), "1".into())
            .await
            .unwrap();
        assert!(state.route.is_none());
        assert_eq!(state.status.as_deref(), Some("Invalid start note or lat/lng"));
        assert!(app.with_map(|m| m.route.is_empty()).await);

        app.route_to_target("b".into(), "45".into(), "9".into())
            .await
            .unwrap();
        assert_eq!(app.with_map(|m| m.route.len()).await, 1);

        let state = app.clear_route().await.unwrap();
        assert!(state.route.is_none());
        assert!(app.with_map(|m| m.route.is_empty()).await);
    });
}

#[test]
fn select_route_only_updates_inputs() {
    use crate::store::MemoryStore;
    use tokio_test::block_on;

    let app = super::test_app(MemoryStore::new(), None);
    let selection = RouteSelection {
        start_id: "a".into(),
        end_id: "b".into(),
        target_lat: "1".into(),
        target_lng: "2".into(),
    };

    let state = block_on(app.select_route(selection.clone())).unwrap();
    assert_eq!(state.selection, selection);
    assert!(state.route.is_none());
    assert!(state.status.is_none());
}
