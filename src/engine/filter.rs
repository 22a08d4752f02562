use crate::entities::{FilterState, Note};
use crate::geo::great_circle_distance;

/// Notes visible under `filter`, in stored order. The boundary is inclusive.
pub fn filter_notes<'a>(notes: &'a [Note], filter: &FilterState) -> Vec<&'a Note> {
    match filter.active_center() {
        Some(center) => notes
            .iter()
            .filter(|n| great_circle_distance(n.coordinates(), center) <= filter.radius_meters)
            .collect(),
        None => notes.iter().collect(),
    }
}

#[cfg(test)]
fn note(id: &str, lat: f64, lng: f64) -> Note {
    Note {
        id: id.into(),
        text: id.into(),
        lat,
        lng,
        ts: 0,
    }
}

#[cfg(test)]
fn ids(notes: Vec<&Note>) -> Vec<&str> {
    notes.into_iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn inactive_filter_shows_everything() {
    use crate::entities::Coordinates;

    let notes = vec![note("a", 0.0, 0.0), note("b", 50.0, 50.0)];

    let filter = FilterState::default();
    assert_eq!(ids(filter_notes(&notes, &filter)), vec!["a", "b"]);

    let filter = FilterState {
        radius_meters: 0.0,
        center: Some(Coordinates::new(0.0, 0.0)),
    };
    assert_eq!(ids(filter_notes(&notes, &filter)), vec!["a", "b"]);

    let filter = FilterState {
        radius_meters: 10.0,
        center: None,
    };
    assert_eq!(ids(filter_notes(&notes, &filter)), vec!["a", "b"]);
}

#[test]
fn radius_selects_nearby_notes() {
    let notes = vec![note("a", 0.0, 0.0), note("b", 0.0, 1.0)];
    let mut filter = FilterState {
        radius_meters: 50_000.0,
        center: Some(notes[0].coordinates()),
    };

    assert_eq!(ids(filter_notes(&notes, &filter)), vec!["a"]);

    filter.radius_meters = 200_000.0;
    assert_eq!(ids(filter_notes(&notes, &filter)), vec!["a", "b"]);
}

#[test]
fn boundary_distance_is_included() {
    let notes = vec![note("a", 0.0, 0.0), note("b", 0.0, 1.0)];
    let distance = great_circle_distance(notes[0].coordinates(), notes[1].coordinates());

    let filter = FilterState {
        radius_meters: distance,
        center: Some(notes[0].coordinates()),
    };
    assert_eq!(ids(filter_notes(&notes, &filter)), vec!["a", "b"]);

    let filter = FilterState {
        radius_meters: distance - 0.001,
        center: Some(notes[0].coordinates()),
    };
    assert_eq!(ids(filter_notes(&notes, &filter)), vec!["a"]);
}

#[test]
fn filtering_preserves_stored_order() {
    use crate::entities::Coordinates;

    let notes = vec![
        note("c", 0.02, 0.0),
        note("far", 10.0, 10.0),
        note("a", 0.0, 0.01),
        note("b", 0.01, 0.0),
    ];
    let filter = FilterState {
        radius_meters: 5_000.0,
        center: Some(Coordinates::new(0.0, 0.0)),
    };

    assert_eq!(ids(filter_notes(&notes, &filter)), vec!["c", "a", "b"]);
}
