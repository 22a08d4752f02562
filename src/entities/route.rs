use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Route picker inputs. Ids reference notes without owning them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSelection {
    pub start_id: String,
    pub end_id: String,
    pub target_lat: String,
    pub target_lng: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    BetweenNotes,
    ToTarget,
}

/// A straight two-point route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: RouteKind,
    pub start: Coordinates,
    pub end: Coordinates,
}

impl Segment {
    pub fn points(&self) -> [Coordinates; 2] {
        [self.start, self.end]
    }
}
