use crate::engine::filter_notes;
use crate::entities::{FilterState, Note, RouteKind, Segment};
use crate::map::{LayerId, MapView, Padding, Popup, Primitive, Style};

pub const FIT_PADDING: Padding = [50, 50];

/// Everything the notes layer shows: one marker per visible note, a line
/// through them in stored order when there are at least two, and the filter
/// circle when filtering is active.
pub fn note_layer(notes: &[Note], filter: &FilterState) -> Vec<Primitive> {
    let visible = filter_notes(notes, filter);

    let mut primitives: Vec<Primitive> = visible
        .iter()
        .map(|n| Primitive::Marker {
            position: n.coordinates(),
            popup: Popup {
                title: n.text.clone(),
                subtitle: n.formatted_timestamp(),
            },
        })
        .collect();

    if visible.len() > 1 {
        primitives.push(Primitive::Polyline {
            points: visible.iter().map(|n| n.coordinates()).collect(),
            style: Style::color("blue"),
        });
    }

    if let Some(center) = filter.active_center() {
        primitives.push(Primitive::Circle {
            center,
            radius_meters: filter.radius_meters,
            style: Style::color("green").fill_opacity(0.05),
        });
    }

    primitives
}

pub fn route_layer(segment: &Segment) -> Vec<Primitive> {
    let style = match segment.kind {
        RouteKind::BetweenNotes => Style::color("red").weight(4),
        RouteKind::ToTarget => Style::color("orange").weight(4).dashed("6,6"),
    };

    vec![Primitive::Polyline {
        points: segment.points().to_vec(),
        style,
    }]
}

/// Full re-render of one layer.
pub fn redraw<M: MapView + ?Sized>(map: &mut M, layer: LayerId, primitives: Vec<Primitive>) {
    map.clear_layer(layer);
    for primitive in primitives {
        map.add_to_layer(layer, primitive);
    }
}

#[cfg(test)]
fn note(id: &str, lat: f64, lng: f64) -> Note {
    Note {
        id: id.into(),
        text: format!("note {}", id),
        lat,
        lng,
        ts: 0,
    }
}

#[test]
fn single_note_has_no_line() {
    let primitives = note_layer(&[note("a", 1.0, 2.0)], &FilterState::default());

    assert_eq!(primitives.len(), 1);
    match &primitives[0] {
        Primitive::Marker { position, popup } => {
            assert_eq!(position.lat, 1.0);
            assert_eq!(popup.title, "note a");
        }
        other => panic!("unexpected primitive {:?}", other),
    }
}

#[test]
fn notes_are_joined_in_stored_order() {
    use crate::entities::Coordinates;

    let notes = vec![note("a", 0.0, 0.0), note("b", 0.0, 1.0), note("c", 1.0, 1.0)];
    let primitives = note_layer(&notes, &FilterState::default());

    assert_eq!(primitives.len(), 4);
    assert_eq!(
        primitives[3],
        Primitive::Polyline {
            points: vec![
                Coordinates::new(0.0, 0.0),
                Coordinates::new(0.0, 1.0),
                Coordinates::new(1.0, 1.0),
            ],
            style: Style::color("blue"),
        }
    );
}

#[test]
fn active_filter_draws_circle_and_hides_far_notes() {
    let notes = vec![note("a", 0.0, 0.0), note("b", 0.0, 1.0)];
    let filter = FilterState {
        radius_meters: 50_000.0,
        center: Some(notes[0].coordinates()),
    };

    let primitives = note_layer(&notes, &filter);
    assert_eq!(primitives.len(), 2);
    assert!(matches!(primitives[0], Primitive::Marker { .. }));
    assert!(matches!(
        primitives[1],
        Primitive::Circle { radius_meters, .. } if radius_meters == 50_000.0
    ));
}

#[test]
fn target_routes_are_dashed() {
    use crate::entities::Coordinates;

    let segment = Segment {
        kind: RouteKind::ToTarget,
        start: Coordinates::new(0.0, 0.0),
        end: Coordinates::new(1.0, 1.0),
    };

    match &route_layer(&segment)[0] {
        Primitive::Polyline { points, style } => {
            assert_eq!(points.len(), 2);
            assert_eq!(style.color, "orange");
            assert_eq!(style.dash_array.as_deref(), Some("6,6"));
        }
        other => panic!("unexpected primitive {:?}", other),
    }
}
