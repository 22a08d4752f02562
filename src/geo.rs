use geo_types::{Coord, Rect};

use crate::entities::Coordinates;

/// Mean Earth radius used by the map renderer's distance calculation.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two points, in meters.
pub fn great_circle_distance(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = ((d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Smallest lat/lng box containing every point.
pub fn bounds<I>(points: I) -> Option<Rect<f64>>
where
    I: IntoIterator<Item = Coordinates>,
{
    let mut points = points.into_iter().map(Coord::from);
    let first = points.next()?;

    let rect = points.fold(Rect::new(first, first), |rect, c| {
        Rect::new(
            Coord {
                x: rect.min().x.min(c.x),
                y: rect.min().y.min(c.y),
            },
            Coord {
                x: rect.max().x.max(c.x),
                y: rect.max().y.max(c.y),
            },
        )
    });

    Some(rect)
}

#[test]
fn one_degree_of_longitude_at_the_equator() {
    let d = great_circle_distance(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
    assert!((d - 111_194.9).abs() < 1.0, "distance was {}", d);
}

#[test]
fn distance_is_symmetric_and_zero_on_self() {
    let a = Coordinates::new(48.8566, 2.3522);
    let b = Coordinates::new(51.5074, -0.1278);

    assert_eq!(great_circle_distance(a, a), 0.0);
    let ab = great_circle_distance(a, b);
    let ba = great_circle_distance(b, a);
    assert!((ab - ba).abs() < 1e-6);
    assert!((ab - 343_500.0).abs() < 1_000.0, "distance was {}", ab);
}

#[test]
fn bounds_cover_all_points() {
    assert!(bounds(Vec::new()).is_none());

    let rect = bounds(vec![Coordinates::new(10.0, 20.0), Coordinates::new(-5.0, 30.0)]).unwrap();
    assert_eq!(rect.min(), Coord { x: 20.0, y: -5.0 });
    assert_eq!(rect.max(), Coord { x: 30.0, y: 10.0 });
}
