use geo_types::Rect;
use serde::{Deserialize, Serialize};

use super::{LayerId, MapConfig, MapView, Padding, Primitive, View};
use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Viewport {
    View(View),
    Bounds {
        south_west: Coordinates,
        north_east: Coordinates,
        padding: Padding,
    },
}

/// In-memory map state, serialized for a thin client renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub config: MapConfig,
    pub viewport: Viewport,
    pub notes: Vec<Primitive>,
    pub route: Vec<Primitive>,
}

impl Scene {
    /// Initialises a map at the configured center and zoom.
    pub fn new(config: MapConfig) -> Self {
        Self {
            viewport: Viewport::View(View {
                center: config.center,
                zoom: config.zoom,
            }),
            config,
            notes: vec![],
            route: vec![],
        }
    }

    pub fn layer(&self, layer: LayerId) -> &[Primitive] {
        match layer {
            LayerId::Notes => &self.notes,
            LayerId::Route => &self.route,
        }
    }

    fn layer_mut(&mut self, layer: LayerId) -> &mut Vec<Primitive> {
        match layer {
            LayerId::Notes => &mut self.notes,
            LayerId::Route => &mut self.route,
        }
    }
}

impl MapView for Scene {
    fn set_view(&mut self, view: View) {
        self.viewport = Viewport::View(view);
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>, padding: Padding) {
        self.viewport = Viewport::Bounds {
            south_west: bounds.min().into(),
            north_east: bounds.max().into(),
            padding,
        };
    }

    fn clear_layer(&mut self, layer: LayerId) {
        self.layer_mut(layer).clear();
    }

    fn add_to_layer(&mut self, layer: LayerId, primitive: Primitive) {
        self.layer_mut(layer).push(primitive);
    }
}

#[test]
fn new_scene_starts_at_configured_view() {
    let scene = Scene::new(MapConfig::default());

    assert_eq!(
        scene.viewport,
        Viewport::View(View {
            center: Coordinates::new(0.0, 0.0),
            zoom: 2,
        })
    );
    assert!(!scene.config.tiles.url_template.is_empty());
    assert!(scene.layer(LayerId::Notes).is_empty());
}

#[test]
fn redraw_replaces_layer_contents() {
    use super::{redraw, Popup};

    let mut scene = Scene::new(MapConfig::default());
    let marker = |lat| Primitive::Marker {
        position: Coordinates::new(lat, 0.0),
        popup: Popup {
            title: "x".into(),
            subtitle: "".into(),
        },
    };

    redraw(&mut scene, LayerId::Notes, vec![marker(1.0), marker(2.0)]);
    redraw(&mut scene, LayerId::Notes, vec![marker(3.0)]);

    assert_eq!(scene.layer(LayerId::Notes), &[marker(3.0)]);
    assert!(scene.layer(LayerId::Route).is_empty());
}

#[test]
fn fit_bounds_records_corners() {
    use crate::geo::bounds;

    let mut scene = Scene::new(MapConfig::default());
    let rect = bounds(vec![Coordinates::new(10.0, 20.0), Coordinates::new(-5.0, 30.0)]).unwrap();
    scene.fit_bounds(rect, [50, 50]);

    assert_eq!(
        scene.viewport,
        Viewport::Bounds {
            south_west: Coordinates::new(-5.0, 20.0),
            north_east: Coordinates::new(10.0, 30.0),
            padding: [50, 50],
        }
    );
}
