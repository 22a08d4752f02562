mod filter_api;
mod map_api;
mod note_api;
mod route_api;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::api::API;
use crate::engine::{Effect, Engine, Event, Purpose, ViewState};
use crate::entities::{Note, Stamp};
use crate::location::{locate, DynLocation};
use crate::map::{redraw, MapView, Scene};
use crate::store::{DynStore, NoteStore};

/// Runtime around the [`Engine`]: owns the collaborators and performs the
/// effects each transition asks for.
pub struct App<M = Scene> {
    inner: Arc<Shared<M>>,
}

impl<M> Clone for App<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Shared<M> {
    state: Mutex<State<M>>,
    location: DynLocation,
    location_timeout: Duration,
}

struct State<M> {
    engine: Engine,
    store: NoteStore<DynStore>,
    map: M,
}

/// Effects that outlive the transition that produced them.
enum Deferred {
    Locate(Purpose),
    ClearStatus { seq: u64, delay: Duration },
}

impl<M: MapView> State<M> {
    /// Runs one transition and applies its store and map effects before the
    /// lock is released, so storage always follows the engine in order.
    fn step(&mut self, event: Event) -> Vec<Deferred> {
        let mut deferred = vec![];

        for effect in self.engine.handle(event) {
            match effect {
                Effect::AcquireLocation(purpose) => deferred.push(Deferred::Locate(purpose)),
                Effect::ClearStatusAfter { seq, delay } => {
                    deferred.push(Deferred::ClearStatus { seq, delay })
                }
                Effect::AppendNote(note) => {
                    if let Err(err) = self.store.add(note) {
                        tracing::error!("failed to save notes: {}", err);
                    }
                }
                Effect::RemoveNote(id) => {
                    if let Err(err) = self.store.remove(&id) {
                        tracing::error!("failed to save notes: {}", err);
                    }
                }
                Effect::Redraw(layer, primitives) => redraw(&mut self.map, layer, primitives),
                Effect::SetView(view) => self.map.set_view(view),
                Effect::FitBounds(rect, padding) => self.map.fit_bounds(rect, padding),
            }
        }

        deferred
    }
}

impl<M> App<M>
where
    M: MapView + Send + 'static,
{
    pub fn new(
        store: NoteStore<DynStore>,
        map: M,
        location: DynLocation,
        location_timeout: Duration,
    ) -> Self {
        let engine = Engine::new(store.notes().to_vec());

        Self {
            inner: Arc::new(Shared {
                state: Mutex::new(State { engine, store, map }),
                location,
                location_timeout,
            }),
        }
    }

    /// Feeds one event through the engine and runs every resulting effect,
    /// including follow-up transitions from location queries.
    #[tracing::instrument(skip(self))]
    pub async fn dispatch(&self, event: Event) -> ViewState {
        self.dispatch_all(vec![event]).await
    }

    pub async fn dispatch_all(&self, events: Vec<Event>) -> ViewState {
        let deferred: Vec<Deferred> = {
            let mut state = self.inner.state.lock().await;
            events
                .into_iter()
                .flat_map(|event| state.step(event))
                .collect()
        };

        self.perform(deferred).await;

        self.inner.state.lock().await.engine.view_state()
    }

    async fn perform(&self, deferred: Vec<Deferred>) {
        let mut queue: VecDeque<Deferred> = deferred.into();

        while let Some(next) = queue.pop_front() {
            match next {
                Deferred::Locate(purpose) => {
                    // the lock is not held while waiting on the platform
                    let outcome =
                        locate(self.inner.location.as_ref(), self.inner.location_timeout).await;
                    let event = Event::Located {
                        purpose,
                        outcome,
                        stamp: Stamp::now(),
                    };

                    let more = self.inner.state.lock().await.step(event);
                    queue.extend(more);
                }
                Deferred::ClearStatus { seq, delay } => {
                    let app = self.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        app.inner
                            .state
                            .lock()
                            .await
                            .step(Event::StatusExpired(seq));
                    });
                }
            }
        }
    }

    /// Re-reads the storage slot.
    pub async fn persisted_notes(&self) -> Vec<Note> {
        self.inner.state.lock().await.store.load()
    }

    async fn has_note(&self, id: &str) -> bool {
        self.inner.state.lock().await.store.find(id).is_some()
    }

    async fn with_map<T>(&self, f: impl FnOnce(&M) -> T) -> T {
        f(&self.inner.state.lock().await.map)
    }
}

impl API for App<Scene> {}

#[cfg(test)]
pub(crate) fn test_app(
    store: crate::store::MemoryStore,
    position: Option<crate::entities::Position>,
) -> App<Scene> {
    use crate::location::{FixedLocation, NoLocation};
    use crate::map::MapConfig;

    let location: DynLocation = match position {
        Some(position) => Arc::new(FixedLocation::new(position)),
        None => Arc::new(NoLocation),
    };

    App::new(
        NoteStore::open(Box::new(store) as DynStore),
        Scene::new(MapConfig::default()),
        location,
        Duration::from_millis(100),
    )
}

#[test]
fn check_in_then_delete_round_trips_through_storage() {
    use crate::entities::Position;
    use crate::store::MemoryStore;
    use tokio_test::block_on;

    let app = test_app(
        MemoryStore::new(),
        Some(Position {
            latitude: 10.0,
            longitude: 20.0,
        }),
    );

    block_on(async {
        let state = app.dispatch(Event::Started).await;
        assert!(state.notes.is_empty());

        app.dispatch(Event::DraftChanged("Lunch".into())).await;
        let state = app.dispatch(Event::CheckIn).await;

        assert_eq!(state.notes.len(), 1);
        assert_eq!(state.notes[0].text, "Lunch");
        assert_eq!((state.notes[0].lat, state.notes[0].lng), (10.0, 20.0));
        assert_eq!(state.draft, "");
        assert_eq!(state.status.as_deref(), Some("Saved"));
        assert_eq!(app.persisted_notes().await, state.notes);

        let id = state.notes[0].id.clone();
        let state = app.dispatch(Event::DeleteNote(id)).await;
        assert!(state.notes.is_empty());
        assert!(app.persisted_notes().await.is_empty());
    });
}

#[test]
fn restart_loads_persisted_notes_and_views_last() {
    use crate::entities::{Coordinates, Position};
    use crate::map::{View, Viewport};
    use crate::store::{MemoryStore, STORAGE_KEY};
    use tokio_test::block_on;

    let payload = r#"[
        {"id":"a","text":"A","lat":1.0,"lng":2.0,"ts":1},
        {"id":"b","text":"B","lat":3.0,"lng":4.0,"ts":2}
    ]"#;
    let app = test_app(
        MemoryStore::with_entry(STORAGE_KEY, payload),
        Some(Position {
            latitude: 50.0,
            longitude: 50.0,
        }),
    );

    block_on(async {
        let state = app.dispatch(Event::Started).await;
        assert_eq!(state.notes.len(), 2);

        let viewport = app.with_map(|m| m.viewport.clone()).await;
        assert_eq!(
            viewport,
            Viewport::View(View {
                center: Coordinates::new(3.0, 4.0),
                zoom: 13,
            })
        );

        let markers = app.with_map(|m| m.notes.len()).await;
        assert_eq!(markers, 3);
    });
}

#[test]
fn unavailable_location_surfaces_status() {
    use crate::store::MemoryStore;
    use tokio_test::block_on;

    let app = test_app(MemoryStore::new(), None);

    block_on(async {
        let state = app.dispatch(Event::CheckIn).await;
        assert!(state.notes.is_empty());
        assert_eq!(
            state.status.as_deref(),
            Some("Failed to get location: Geolocation not available in this environment")
        );
        assert!(app.persisted_notes().await.is_empty());
    });
}

#[test]
fn status_clears_after_delay() {
    use crate::entities::Position;
    use crate::store::MemoryStore;
    use tokio_test::block_on;

    let app = test_app(
        MemoryStore::new(),
        Some(Position {
            latitude: 0.0,
            longitude: 0.0,
        }),
    );

    block_on(async {
        let state = app.dispatch(Event::DrawRouteBetween).await;
        assert_eq!(state.status.as_deref(), Some("choose start and end"));

        tokio::time::sleep(Duration::from_millis(1700)).await;
        let state = app.dispatch(Event::DraftChanged("".into())).await;
        assert_eq!(state.status, None);
    });
}

#[cfg(test)]
struct SlowLocation;

#[cfg(test)]
#[async_trait::async_trait]
impl crate::location::LocationProvider for SlowLocation {
    async fn current_position(
        &self,
    ) -> Result<crate::entities::Position, crate::location::LocationError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(crate::entities::Position {
            latitude: 1.0,
            longitude: 2.0,
        })
    }
}

#[test]
fn overlapping_check_ins_keep_storage_in_step() {
    use crate::map::MapConfig;
    use crate::store::{MemoryStore, STORAGE_KEY};

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(8)
        .enable_all()
        .build()
        .unwrap();

    for _ in 0..20 {
        let payload = r#"[
            {"id":"p0","text":"P0","lat":0.0,"lng":0.0,"ts":1},
            {"id":"p1","text":"P1","lat":0.0,"lng":0.0,"ts":2},
            {"id":"p2","text":"P2","lat":0.0,"lng":0.0,"ts":3},
            {"id":"p3","text":"P3","lat":0.0,"lng":0.0,"ts":4}
        ]"#;
        let app = App::new(
            NoteStore::open(Box::new(MemoryStore::with_entry(STORAGE_KEY, payload)) as DynStore),
            Scene::new(MapConfig::default()),
            Arc::new(SlowLocation),
            Duration::from_millis(500),
        );

        runtime.block_on(async {
            let mut tasks = vec![];
            for i in 0..16 {
                let checkin_app = app.clone();
                tasks.push(tokio::spawn(async move {
                    checkin_app.dispatch(Event::CheckIn).await;
                }));
                if i % 4 == 0 {
                    let app = app.clone();
                    let id = format!("p{}", i / 4);
                    tasks.push(tokio::spawn(async move {
                        app.dispatch(Event::DeleteNote(id)).await;
                    }));
                }
            }
            for task in tasks {
                task.await.unwrap();
            }

            let in_memory = app.inner.state.lock().await.engine.notes().to_vec();
            assert_eq!(in_memory.len(), 16);
            assert_eq!(app.persisted_notes().await, in_memory);
        });
    }
}
