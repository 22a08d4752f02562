use async_trait::async_trait;

use super::App;
use crate::api::NoteAPI;
use crate::engine::{Event, ViewState};
use crate::error::{not_found_error, Error};
use crate::map::Scene;

#[async_trait]
impl NoteAPI for App<Scene> {
    async fn view_state(&self) -> Result<ViewState, Error> {
        Ok(self.inner.state.lock().await.engine.view_state())
    }

    async fn set_draft(&self, text: String) -> Result<ViewState, Error> {
        Ok(self.dispatch(Event::DraftChanged(text)).await)
    }

    #[tracing::instrument(skip(self))]
    async fn check_in(&self) -> Result<ViewState, Error> {
        Ok(self.dispatch(Event::CheckIn).await)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_note(&self, id: String) -> Result<ViewState, Error> {
        Ok(self.dispatch(Event::DeleteNote(id)).await)
    }

    #[tracing::instrument(skip(self))]
    async fn focus_note(&self, id: String) -> Result<ViewState, Error> {
        if !self.has_note(&id).await {
            return Err(not_found_error());
        }

        Ok(self.dispatch(Event::FocusNote(id)).await)
    }
}

#[test]
fn focus_unknown_note_is_not_found() {
    use crate::store::MemoryStore;
    use tokio_test::block_on;

    let app = super::test_app(MemoryStore::new(), None);

    let err = block_on(app.focus_note("missing".into())).unwrap_err();
    assert_eq!(err.code, 102);
}

#[test]
fn focus_moves_viewport_to_note() {
    use crate::entities::{Coordinates, Position};
    use crate::map::{View, Viewport};
    use crate::store::MemoryStore;
    use tokio_test::block_on;

    let app = super::test_app(
        MemoryStore::new(),
        Some(Position {
            latitude: 7.0,
            longitude: 8.0,
        }),
    );

    block_on(async {
        let state = app.check_in().await.unwrap();
        app.focus_note(state.notes[0].id.clone()).await.unwrap();
        let viewport = app.with_map(|m| m.viewport.clone()).await;
        assert_eq!(
            viewport,
            Viewport::View(View {
                center: Coordinates::new(7.0, 8.0),
                zoom: 14,
            })
        );
    });
}
