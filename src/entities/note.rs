use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Coordinates, Position};

pub const DEFAULT_NOTE_TEXT: &str = "Check-in";

/// A persisted check-in. Never mutated once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
    pub lat: f64,
    pub lng: f64,
    pub ts: i64,
}

/// Identity and creation time handed to a new note by the runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct Stamp {
    pub id: String,
    pub ts: i64,
}

impl Stamp {
    pub fn now() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ts: Utc::now().timestamp_millis(),
        }
    }
}

impl Note {
    pub fn new(stamp: Stamp, text: &str, position: Position) -> Self {
        let text = match text.trim() {
            "" => DEFAULT_NOTE_TEXT,
            trimmed => trimmed,
        };

        Self {
            id: stamp.id,
            text: text.into(),
            lat: position.latitude,
            lng: position.longitude,
            ts: stamp.ts,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Label used by the route pickers.
    pub fn label(&self) -> String {
        format!("{} ({:.4}, {:.4})", self.text, self.lat, self.lng)
    }

    pub fn formatted_timestamp(&self) -> String {
        match Local.timestamp_millis_opt(self.ts).single() {
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.ts.to_string(),
        }
    }
}

#[test]
fn new_note_trims_and_defaults_text() {
    let position = Position {
        latitude: 10.0,
        longitude: 20.0,
    };
    let stamp = Stamp {
        id: "a".into(),
        ts: 1,
    };

    let note = Note::new(stamp.clone(), "  Lunch ", position);
    assert_eq!(note.text, "Lunch");
    assert_eq!(note.coordinates(), Coordinates::new(10.0, 20.0));

    let note = Note::new(stamp, "   ", position);
    assert_eq!(note.text, DEFAULT_NOTE_TEXT);
}

#[test]
fn note_label_rounds_coordinates() {
    let note = Note {
        id: "a".into(),
        text: "Cafe".into(),
        lat: 51.500_729_2,
        lng: -0.124_625_4,
        ts: 0,
    };

    assert_eq!(note.label(), "Cafe (51.5007, -0.1246)");
}

#[test]
fn note_serializes_with_short_field_names() {
    let note = Note {
        id: "kx1".into(),
        text: "Lunch".into(),
        lat: 10.0,
        lng: 20.0,
        ts: 1_700_000_000_000,
    };

    let value = serde_json::to_value(&note).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "id": "kx1",
            "text": "Lunch",
            "lat": 10.0,
            "lng": 20.0,
            "ts": 1_700_000_000_000i64,
        })
    );
}

#[test]
fn stamps_are_unique() {
    assert_ne!(Stamp::now().id, Stamp::now().id);
}
