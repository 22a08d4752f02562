mod filter;
mod route;

pub use filter::filter_notes;
pub use route::{route_between, route_to_target, RouteError};

use std::time::Duration;

use geo_types::Rect;
use serde::{Deserialize, Serialize};

use crate::entities::{FilterState, Note, Position, RouteSelection, Segment, Stamp, Status};
use crate::geo::bounds;
use crate::location::LocationError;
use crate::map::{note_layer, route_layer, LayerId, Padding, Primitive, View, FIT_PADDING};

pub const NOTE_ZOOM: u8 = 14;
pub const INITIAL_ZOOM: u8 = 13;

pub const CHECK_IN_STATUS_DELAY: Duration = Duration::from_millis(2500);
pub const FILTER_STATUS_DELAY: Duration = Duration::from_millis(2000);
pub const ROUTE_STATUS_DELAY: Duration = Duration::from_millis(2000);
pub const SELECTION_STATUS_DELAY: Duration = Duration::from_millis(1500);

/// What a pending location query is for.
#[derive(Clone, Debug, PartialEq)]
pub enum Purpose {
    CheckIn { text: String },
    FilterCenter,
    InitialView,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Started,
    DraftChanged(String),
    CheckIn,
    Located {
        purpose: Purpose,
        outcome: Result<Position, LocationError>,
        stamp: Stamp,
    },
    DeleteNote(String),
    FocusNote(String),
    SetRadius(f64),
    SetFilterCenterToCurrent,
    ClearFilter,
    SelectRouteStart(String),
    SelectRouteEnd(String),
    SetTargetLat(String),
    SetTargetLng(String),
    DrawRouteBetween,
    DrawRouteToTarget,
    ClearRoute,
    StatusExpired(u64),
}

/// Work the runtime performs on the engine's behalf.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    AcquireLocation(Purpose),
    AppendNote(Note),
    RemoveNote(String),
    Redraw(LayerId, Vec<Primitive>),
    SetView(View),
    FitBounds(Rect<f64>, Padding),
    ClearStatusAfter { seq: u64, delay: Duration },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteOption {
    pub id: String,
    pub label: String,
}

/// Serializable snapshot of everything the UI shows besides the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub notes: Vec<Note>,
    pub draft: String,
    pub status: Option<String>,
    pub filter: FilterState,
    pub selection: RouteSelection,
    pub route: Option<Segment>,
    pub route_options: Vec<RouteOption>,
}

/// The application controller: current state plus a transition function.
#[derive(Debug, Default)]
pub struct Engine {
    notes: Vec<Note>,
    draft: String,
    filter: FilterState,
    selection: RouteSelection,
    route: Option<Segment>,
    status: Option<Status>,
    status_seq: u64,
}

impl Engine {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes,
            ..Self::default()
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn visible_notes(&self) -> Vec<&Note> {
        filter_notes(&self.notes, &self.filter)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selection(&self) -> &RouteSelection {
        &self.selection
    }

    pub fn route(&self) -> Option<&Segment> {
        self.route.as_ref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            notes: self.notes.clone(),
            draft: self.draft.clone(),
            status: self.status.as_ref().map(|s| s.text.clone()),
            filter: self.filter,
            selection: self.selection.clone(),
            route: self.route.clone(),
            route_options: self
                .notes
                .iter()
                .map(|n| RouteOption {
                    id: n.id.clone(),
                    label: n.label(),
                })
                .collect(),
        }
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Started => self.start(),
            Event::DraftChanged(text) => {
                self.draft = text;
                vec![]
            }
            Event::CheckIn => {
                self.show_status("Getting location...");
                vec![Effect::AcquireLocation(Purpose::CheckIn {
                    text: self.draft.clone(),
                })]
            }
            Event::Located {
                purpose,
                outcome,
                stamp,
            } => self.located(purpose, outcome, stamp),
            Event::DeleteNote(id) => self.delete(id),
            Event::FocusNote(id) => match self.notes.iter().find(|n| n.id == id) {
                Some(note) => vec![Effect::SetView(View {
                    center: note.coordinates(),
                    zoom: NOTE_ZOOM,
                })],
                None => vec![],
            },
            Event::SetRadius(radius_meters) => {
                let before = self.filter;
                self.filter.set_radius(radius_meters);
                if self.filter == before {
                    return vec![];
                }
                vec![self.redraw_notes()]
            }
            Event::SetFilterCenterToCurrent => {
                self.show_status("Getting location for filter...");
                vec![Effect::AcquireLocation(Purpose::FilterCenter)]
            }
            Event::ClearFilter => {
                self.filter.clear();
                vec![self.redraw_notes()]
            }
            Event::SelectRouteStart(id) => {
                self.selection.start_id = id;
                vec![]
            }
            Event::SelectRouteEnd(id) => {
                self.selection.end_id = id;
                vec![]
            }
            Event::SetTargetLat(lat) => {
                self.selection.target_lat = lat;
                vec![]
            }
            Event::SetTargetLng(lng) => {
                self.selection.target_lng = lng;
                vec![]
            }
            Event::DrawRouteBetween => {
                let selection = &self.selection;
                let result = route_between(&self.notes, &selection.start_id, &selection.end_id);
                self.draw_route(result, "choose start and end")
            }
            Event::DrawRouteToTarget => {
                let selection = &self.selection;
                let result = route_to_target(
                    &self.notes,
                    &selection.start_id,
                    &selection.target_lat,
                    &selection.target_lng,
                );
                self.draw_route(result, "choose start note")
            }
            Event::ClearRoute => {
                self.route = None;
                vec![Effect::Redraw(LayerId::Route, vec![])]
            }
            Event::StatusExpired(seq) => {
                if self.status.as_ref().map(|s| s.seq) == Some(seq) {
                    self.status = None;
                }
                vec![]
            }
        }
    }

    fn start(&mut self) -> Vec<Effect> {
        let mut effects = vec![self.redraw_notes()];

        match self.notes.last() {
            Some(last) => effects.push(Effect::SetView(View {
                center: last.coordinates(),
                zoom: INITIAL_ZOOM,
            })),
            None => effects.push(Effect::AcquireLocation(Purpose::InitialView)),
        }

        effects
    }

    fn located(
        &mut self,
        purpose: Purpose,
        outcome: Result<Position, LocationError>,
        stamp: Stamp,
    ) -> Vec<Effect> {
        match (purpose, outcome) {
            (Purpose::CheckIn { text }, Ok(position)) => {
                let note = Note::new(stamp, &text, position);
                let center = note.coordinates();

                tracing::info!("checked in note {} at {:?}", note.id, center);

                self.notes.push(note.clone());
                self.draft.clear();
                let seq = self.show_status("Saved");

                vec![
                    Effect::AppendNote(note),
                    self.redraw_notes(),
                    Effect::SetView(View {
                        center,
                        zoom: NOTE_ZOOM,
                    }),
                    Effect::ClearStatusAfter {
                        seq,
                        delay: CHECK_IN_STATUS_DELAY,
                    },
                ]
            }
            (Purpose::CheckIn { .. }, Err(err)) => {
                let seq = self.show_status(&format!("Failed to get location: {}", err));
                vec![Effect::ClearStatusAfter {
                    seq,
                    delay: CHECK_IN_STATUS_DELAY,
                }]
            }
            (Purpose::FilterCenter, Ok(position)) => {
                self.filter.center = Some(position.into());
                let seq = self.show_status("Filter center set");
                vec![
                    self.redraw_notes(),
                    Effect::ClearStatusAfter {
                        seq,
                        delay: FILTER_STATUS_DELAY,
                    },
                ]
            }
            (Purpose::FilterCenter, Err(err)) => {
                let seq = self.show_status(&format!("Failed: {}", err));
                vec![Effect::ClearStatusAfter {
                    seq,
                    delay: FILTER_STATUS_DELAY,
                }]
            }
            (Purpose::InitialView, Ok(position)) => vec![Effect::SetView(View {
                center: position.into(),
                zoom: INITIAL_ZOOM,
            })],
            (Purpose::InitialView, Err(_)) => vec![],
        }
    }

    fn delete(&mut self, id: String) -> Vec<Effect> {
        if !self.notes.iter().any(|n| n.id == id) {
            return vec![];
        }

        tracing::info!("deleting note {}", id);

        self.notes.retain(|n| n.id != id);
        vec![Effect::RemoveNote(id), self.redraw_notes()]
    }

    fn draw_route(&mut self, result: Result<Segment, RouteError>, unselected: &str) -> Vec<Effect> {
        if let Err(RouteError::NotSelected) = result {
            let seq = self.show_status(unselected);
            return vec![Effect::ClearStatusAfter {
                seq,
                delay: SELECTION_STATUS_DELAY,
            }];
        }

        self.route = None;
        let mut effects = vec![Effect::Redraw(LayerId::Route, vec![])];

        match result {
            Ok(segment) => {
                tracing::info!("drawing {:?} route", segment.kind);

                effects.push(Effect::Redraw(LayerId::Route, route_layer(&segment)));
                if let Some(rect) = bounds(segment.points()) {
                    effects.push(Effect::FitBounds(rect, FIT_PADDING));
                }
                self.route = Some(segment);
            }
            Err(err) => {
                let seq = self.show_status(&err.to_string());
                effects.push(Effect::ClearStatusAfter {
                    seq,
                    delay: ROUTE_STATUS_DELAY,
                });
            }
        }

        effects
    }

    fn redraw_notes(&self) -> Effect {
        Effect::Redraw(LayerId::Notes, note_layer(&self.notes, &self.filter))
    }

    fn show_status(&mut self, text: &str) -> u64 {
        self.status_seq += 1;
        self.status = Some(Status {
            seq: self.status_seq,
            text: text.into(),
        });
        self.status_seq
    }
}

#[cfg(test)]
fn here(latitude: f64, longitude: f64) -> Result<Position, LocationError> {
    Ok(Position {
        latitude,
        longitude,
    })
}

#[cfg(test)]
fn stamp(id: &str) -> Stamp {
    Stamp {
        id: id.into(),
        ts: 1_700_000_000_000,
    }
}

#[cfg(test)]
fn check_in(engine: &mut Engine, id: &str, text: &str, lat: f64, lng: f64) -> Vec<Effect> {
    engine.handle(Event::DraftChanged(text.into()));
    let effects = engine.handle(Event::CheckIn);
    let purpose = match &effects[..] {
        [Effect::AcquireLocation(purpose)] => purpose.clone(),
        other => panic!("unexpected effects {:?}", other),
    };

    engine.handle(Event::Located {
        purpose,
        outcome: here(lat, lng),
        stamp: stamp(id),
    })
}

#[test]
fn check_in_appends_and_recenters() {
    let mut engine = Engine::new(vec![]);

    let effects = check_in(&mut engine, "n1", "Lunch", 10.0, 20.0);

    assert_eq!(engine.notes().len(), 1);
    let note = &engine.notes()[0];
    assert_eq!(note.text, "Lunch");
    assert_eq!((note.lat, note.lng), (10.0, 20.0));
    assert_eq!(engine.draft(), "");
    assert_eq!(engine.status().unwrap().text, "Saved");

    assert_eq!(effects[0], Effect::AppendNote(note.clone()));
    assert!(effects.contains(&Effect::SetView(View {
        center: note.coordinates(),
        zoom: NOTE_ZOOM,
    })));
    assert!(effects.contains(&Effect::ClearStatusAfter {
        seq: engine.status().unwrap().seq,
        delay: CHECK_IN_STATUS_DELAY,
    }));
}

#[test]
fn check_in_uses_draft_at_request_time() {
    let mut engine = Engine::new(vec![]);
    engine.handle(Event::DraftChanged("first".into()));
    let effects = engine.handle(Event::CheckIn);
    engine.handle(Event::DraftChanged("second".into()));

    assert_eq!(
        effects,
        vec![Effect::AcquireLocation(Purpose::CheckIn {
            text: "first".into()
        })]
    );
    assert_eq!(engine.status().unwrap().text, "Getting location...");
}

#[test]
fn empty_draft_defaults_note_text() {
    let mut engine = Engine::new(vec![]);
    check_in(&mut engine, "n1", "  ", 0.0, 0.0);

    assert_eq!(engine.notes()[0].text, "Check-in");
}

#[test]
fn failed_check_in_reports_reason() {
    let mut engine = Engine::new(vec![]);
    engine.handle(Event::DraftChanged("keep me".into()));

    let effects = engine.handle(Event::Located {
        purpose: Purpose::CheckIn {
            text: "keep me".into(),
        },
        outcome: Err(LocationError::Denied("User denied Geolocation".into())),
        stamp: stamp("n1"),
    });

    assert!(engine.notes().is_empty());
    assert_eq!(engine.draft(), "keep me");
    assert_eq!(
        engine.status().unwrap().text,
        "Failed to get location: User denied Geolocation"
    );
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::ClearStatusAfter { .. }));
}

#[test]
fn delete_removes_in_place() {
    let mut engine = Engine::new(vec![]);
    check_in(&mut engine, "a", "A", 0.0, 0.0);
    check_in(&mut engine, "b", "B", 1.0, 1.0);
    check_in(&mut engine, "c", "C", 2.0, 2.0);

    let effects = engine.handle(Event::DeleteNote("b".into()));
    assert_eq!(effects[0], Effect::RemoveNote("b".into()));

    let ids: Vec<&str> = engine.notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);

    assert!(engine.handle(Event::DeleteNote("b".into())).is_empty());
    assert_eq!(engine.notes().len(), 2);
}

#[test]
fn filter_center_comes_from_location() {
    let mut engine = Engine::new(vec![]);
    check_in(&mut engine, "a", "A", 0.0, 0.0);
    check_in(&mut engine, "b", "B", 0.0, 1.0);

    engine.handle(Event::SetRadius(50_000.0));
    assert_eq!(engine.visible_notes().len(), 2);

    let effects = engine.handle(Event::SetFilterCenterToCurrent);
    assert_eq!(effects, vec![Effect::AcquireLocation(Purpose::FilterCenter)]);

    let effects = engine.handle(Event::Located {
        purpose: Purpose::FilterCenter,
        outcome: here(0.0, 0.0),
        stamp: stamp("unused"),
    });
    assert_eq!(engine.status().unwrap().text, "Filter center set");
    assert!(matches!(effects[0], Effect::Redraw(LayerId::Notes, _)));

    let visible: Vec<&str> = engine.visible_notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(visible, vec!["a"]);

    engine.handle(Event::SetRadius(200_000.0));
    assert_eq!(engine.visible_notes().len(), 2);

    engine.handle(Event::ClearFilter);
    assert_eq!(*engine.filter(), FilterState::default());
}

#[test]
fn filter_failure_keeps_previous_center() {
    let mut engine = Engine::new(vec![]);

    engine.handle(Event::Located {
        purpose: Purpose::FilterCenter,
        outcome: Err(LocationError::Timeout),
        stamp: stamp("unused"),
    });

    assert_eq!(engine.filter().center, None);
    assert_eq!(engine.status().unwrap().text, "Failed: Timeout expired");
}

#[test]
fn unchanged_radius_does_not_redraw() {
    let mut engine = Engine::new(vec![]);

    assert!(engine.handle(Event::SetRadius(0.0)).is_empty());
    assert_eq!(engine.handle(Event::SetRadius(10.0)).len(), 1);
    assert!(engine.handle(Event::SetRadius(10.0)).is_empty());
}

#[test]
fn route_between_notes_fits_viewport() {
    let mut engine = Engine::new(vec![]);
    check_in(&mut engine, "a", "A", 0.0, 0.0);
    check_in(&mut engine, "b", "B", 0.0, 1.0);

    engine.handle(Event::SelectRouteStart("a".into()));
    engine.handle(Event::SelectRouteEnd("b".into()));
    let effects = engine.handle(Event::DrawRouteBetween);

    let route = engine.route().unwrap();
    assert_eq!(route.start, engine.notes()[0].coordinates());
    assert_eq!(route.end, engine.notes()[1].coordinates());

    assert_eq!(effects[0], Effect::Redraw(LayerId::Route, vec![]));
    assert!(matches!(&effects[1], Effect::Redraw(LayerId::Route, p) if p.len() == 1));
    assert!(matches!(effects[2], Effect::FitBounds(_, FIT_PADDING)));
}

#[test]
fn missing_route_note_clears_and_reports() {
    let mut engine = Engine::new(vec![]);
    check_in(&mut engine, "a", "A", 0.0, 0.0);
    check_in(&mut engine, "b", "B", 0.0, 1.0);
    engine.handle(Event::SelectRouteStart("a".into()));
    engine.handle(Event::SelectRouteEnd("b".into()));
    engine.handle(Event::DrawRouteBetween);

    engine.handle(Event::DeleteNote("b".into()));
    let effects = engine.handle(Event::DrawRouteBetween);

    assert!(engine.route().is_none());
    assert_eq!(engine.status().unwrap().text, "Start or end note not found");
    assert_eq!(effects[0], Effect::Redraw(LayerId::Route, vec![]));
    assert!(!effects.iter().any(|e| matches!(e, Effect::FitBounds(..))));
}

#[test]
fn unselected_route_keeps_existing_route() {
    let mut engine = Engine::new(vec![]);
    check_in(&mut engine, "a", "A", 0.0, 0.0);
    engine.handle(Event::SelectRouteStart("a".into()));
    engine.handle(Event::SetTargetLat("1".into()));
    engine.handle(Event::SetTargetLng("1".into()));
    engine.handle(Event::DrawRouteToTarget);
    assert!(engine.route().is_some());

    let effects = engine.handle(Event::DrawRouteBetween);
    assert!(engine.route().is_some());
    assert_eq!(engine.status().unwrap().text, "choose start and end");
    assert!(matches!(
        effects[..],
        [Effect::ClearStatusAfter { delay, .. }] if delay == SELECTION_STATUS_DELAY
    ));
}

#[test]
fn invalid_target_draws_nothing() {
    let mut engine = Engine::new(vec![]);
    check_in(&mut engine, "a", "A", 0.0, 0.0);
    engine.handle(Event::SelectRouteStart("a".into()));
    engine.handle(Event::SetTargetLat("abc".into()));
    engine.handle(Event::SetTargetLng("1".into()));

    engine.handle(Event::DrawRouteToTarget);
    assert!(engine.route().is_none());
    assert_eq!(engine.status().unwrap().text, "Invalid start note or lat/lng");

    engine.handle(Event::SetTargetLat("2.5".into()));
    engine.handle(Event::DrawRouteToTarget);
    let route = engine.route().unwrap();
    assert_eq!((route.end.lat, route.end.lng), (2.5, 1.0));

    engine.handle(Event::ClearRoute);
    assert!(engine.route().is_none());
}

#[test]
fn stale_status_timer_leaves_newer_message() {
    let mut engine = Engine::new(vec![]);
    engine.handle(Event::DrawRouteBetween);
    let first = engine.status().unwrap().seq;

    engine.handle(Event::DrawRouteToTarget);
    let second = engine.status().unwrap().seq;

    engine.handle(Event::StatusExpired(first));
    assert_eq!(engine.status().unwrap().text, "choose start note");

    engine.handle(Event::StatusExpired(second));
    assert!(engine.status().is_none());
}

#[test]
fn start_views_last_note_or_asks_for_location() {
    let mut engine = Engine::new(vec![]);
    let effects = engine.handle(Event::Started);
    assert_eq!(effects[1], Effect::AcquireLocation(Purpose::InitialView));

    let effects = engine.handle(Event::Located {
        purpose: Purpose::InitialView,
        outcome: Err(LocationError::Unavailable),
        stamp: stamp("unused"),
    });
    assert!(effects.is_empty());
    assert!(engine.status().is_none());

    check_in(&mut engine, "a", "A", 0.0, 0.0);
    check_in(&mut engine, "b", "B", 5.0, 6.0);
    let mut engine = Engine::new(engine.notes().to_vec());
    let effects = engine.handle(Event::Started);
    assert_eq!(
        effects[1],
        Effect::SetView(View {
            center: crate::entities::Coordinates::new(5.0, 6.0),
            zoom: INITIAL_ZOOM,
        })
    );
}

#[test]
fn view_state_lists_route_options() {
    let mut engine = Engine::new(vec![]);
    check_in(&mut engine, "a", "Cafe", 1.0, 2.0);

    let state = engine.view_state();
    assert_eq!(
        state.route_options,
        vec![RouteOption {
            id: "a".into(),
            label: "Cafe (1.0000, 2.0000)".into(),
        }]
    );
    assert_eq!(state.status.as_deref(), Some("Saved"));
}
