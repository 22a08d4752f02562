use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};

/// A point in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Coord {
            x: coordinates.lng,
            y: coordinates.lat,
        }
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.lng, coordinates.lat)
    }
}

impl From<Coord<f64>> for Coordinates {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }
}

/// A fix reported by the location provider.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Position> for Coordinates {
    fn from(position: Position) -> Self {
        Self {
            lat: position.latitude,
            lng: position.longitude,
        }
    }
}

#[test]
fn geo_types_use_lng_as_x() {
    let coordinates = Coordinates::new(10.0, 20.0);

    let point: Point<f64> = coordinates.into();
    assert_eq!(point.x(), 20.0);
    assert_eq!(point.y(), 10.0);

    let back: Coordinates = Coord::from(coordinates).into();
    assert_eq!(back, coordinates);
}
