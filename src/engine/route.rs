use std::fmt;

use crate::entities::{Coordinates, Note, RouteKind, Segment};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteError {
    /// A required note was not picked.
    NotSelected,
    /// A referenced note does not exist.
    NotFound,
    /// Unknown start note or non-numeric target.
    Invalid,
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSelected => write!(f, "route selection incomplete"),
            Self::NotFound => write!(f, "Start or end note not found"),
            Self::Invalid => write!(f, "Invalid start note or lat/lng"),
        }
    }
}

impl std::error::Error for RouteError {}

fn find<'a>(notes: &'a [Note], id: &str) -> Option<&'a Note> {
    notes.iter().find(|n| n.id == id)
}

/// Straight segment from one saved note to another.
pub fn route_between(notes: &[Note], start_id: &str, end_id: &str) -> Result<Segment, RouteError> {
    if start_id.is_empty() || end_id.is_empty() {
        return Err(RouteError::NotSelected);
    }

    match (find(notes, start_id), find(notes, end_id)) {
        (Some(start), Some(end)) => Ok(Segment {
            kind: RouteKind::BetweenNotes,
            start: start.coordinates(),
            end: end.coordinates(),
        }),
        _ => Err(RouteError::NotFound),
    }
}

/// Straight segment from a saved note to a typed-in coordinate.
pub fn route_to_target(
    notes: &[Note],
    start_id: &str,
    lat: &str,
    lng: &str,
) -> Result<Segment, RouteError> {
    if start_id.is_empty() {
        return Err(RouteError::NotSelected);
    }

    let start = find(notes, start_id).ok_or(RouteError::Invalid)?;
    let lat = parse_degrees(lat).ok_or(RouteError::Invalid)?;
    let lng = parse_degrees(lng).ok_or(RouteError::Invalid)?;

    Ok(Segment {
        kind: RouteKind::ToTarget,
        start: start.coordinates(),
        end: Coordinates::new(lat, lng),
    })
}

fn parse_degrees(input: &str) -> Option<f64> {
    input.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
fn notes() -> Vec<Note> {
    vec![
        Note {
            id: "a".into(),
            text: "A".into(),
            lat: 0.0,
            lng: 0.0,
            ts: 0,
        },
        Note {
            id: "b".into(),
            text: "B".into(),
            lat: 0.0,
            lng: 1.0,
            ts: 0,
        },
    ]
}

#[test]
fn route_between_orders_start_then_end() {
    let notes = notes();

    let segment = route_between(&notes, "b", "a").unwrap();
    assert_eq!(segment.kind, RouteKind::BetweenNotes);
    assert_eq!(
        segment.points(),
        [Coordinates::new(0.0, 1.0), Coordinates::new(0.0, 0.0)]
    );
}

#[test]
fn route_between_missing_note() {
    let notes = notes();

    assert_eq!(route_between(&notes, "a", "zzz"), Err(RouteError::NotFound));
    assert_eq!(route_between(&notes, "zzz", "a"), Err(RouteError::NotFound));
    assert_eq!(route_between(&notes, "", "a"), Err(RouteError::NotSelected));
    assert_eq!(route_between(&notes, "a", ""), Err(RouteError::NotSelected));
}

#[test]
fn route_to_target_parses_coordinates() {
    let notes = notes();

    let segment = route_to_target(&notes, "a", " 10.5", "-20 ").unwrap();
    assert_eq!(segment.kind, RouteKind::ToTarget);
    assert_eq!(
        segment.points(),
        [Coordinates::new(0.0, 0.0), Coordinates::new(10.5, -20.0)]
    );
}

#[test]
fn route_to_target_rejects_bad_input() {
    let notes = notes();

    assert_eq!(route_to_target(&notes, "a", "north", "1"), Err(RouteError::Invalid));
    assert_eq!(route_to_target(&notes, "a", "1", ""), Err(RouteError::Invalid));
    assert_eq!(route_to_target(&notes, "a", "NaN", "1"), Err(RouteError::Invalid));
    assert_eq!(route_to_target(&notes, "a", "inf", "1"), Err(RouteError::Invalid));
    assert_eq!(route_to_target(&notes, "zzz", "1", "1"), Err(RouteError::Invalid));
    assert_eq!(route_to_target(&notes, "", "1", "1"), Err(RouteError::NotSelected));
}
