use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Distance filter around a chosen center. A radius of zero disables it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub radius_meters: f64,
    pub center: Option<Coordinates>,
}

impl FilterState {
    /// Returns the center when the filter restricts the visible notes.
    pub fn active_center(&self) -> Option<Coordinates> {
        match self.center {
            Some(center) if self.radius_meters > 0.0 => Some(center),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_center().is_some()
    }

    /// Negative or non-finite input counts as zero.
    pub fn set_radius(&mut self, radius_meters: f64) {
        self.radius_meters = if radius_meters.is_finite() && radius_meters > 0.0 {
            radius_meters
        } else {
            0.0
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[test]
fn filter_needs_radius_and_center() {
    let mut filter = FilterState::default();
    assert!(!filter.is_active());

    filter.set_radius(100.0);
    assert!(!filter.is_active());

    filter.center = Some(Coordinates::new(0.0, 0.0));
    assert!(filter.is_active());

    filter.set_radius(-5.0);
    assert_eq!(filter.radius_meters, 0.0);
    assert!(!filter.is_active());

    filter.set_radius(f64::NAN);
    assert_eq!(filter.radius_meters, 0.0);

    filter.set_radius(10.0);
    filter.clear();
    assert_eq!(filter, FilterState::default());
}
