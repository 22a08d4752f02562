mod coordinates;
mod filter;
mod note;
mod route;
mod status;

pub use coordinates::{Coordinates, Position};
pub use filter::FilterState;
pub use note::{Note, Stamp, DEFAULT_NOTE_TEXT};
pub use route::{RouteKind, RouteSelection, Segment};
pub use status::Status;
