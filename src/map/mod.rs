mod config;
mod primitives;
mod scene;
mod sync;

pub use config::{MapConfig, MarkerIcon, TileLayer};
pub use primitives::{LayerId, Padding, Popup, Primitive, Style, View};
pub use scene::{Scene, Viewport};
pub use sync::{note_layer, redraw, route_layer, FIT_PADDING};

use geo_types::Rect;

/// Interactive map collaborator. Implementations are initialised from a
/// [`MapConfig`] and own two layer groups, one per [`LayerId`].
pub trait MapView {
    fn set_view(&mut self, view: View);
    fn fit_bounds(&mut self, bounds: Rect<f64>, padding: Padding);
    fn clear_layer(&mut self, layer: LayerId);
    fn add_to_layer(&mut self, layer: LayerId, primitive: Primitive);
}
