use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: OSM_TILE_URL.into(),
            attribution: "&copy; OpenStreetMap contributors".into(),
            max_zoom: 19,
        }
    }
}

/// Marker image handed to the renderer at initialisation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub icon_url: String,
    pub icon_retina_url: String,
    pub shadow_url: String,
    pub icon_size: [u32; 2],
    pub icon_anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
    pub shadow_size: [u32; 2],
}

impl Default for MarkerIcon {
    fn default() -> Self {
        let base = "https://unpkg.com/leaflet@1.9.4/dist/images";

        Self {
            icon_url: format!("{}/marker-icon.png", base),
            icon_retina_url: format!("{}/marker-icon-2x.png", base),
            shadow_url: format!("{}/marker-shadow.png", base),
            icon_size: [25, 41],
            icon_anchor: [12, 41],
            popup_anchor: [1, -34],
            shadow_size: [41, 41],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub center: Coordinates,
    pub zoom: u8,
    pub tiles: TileLayer,
    pub marker_icon: MarkerIcon,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: Coordinates::new(0.0, 0.0),
            zoom: 2,
            tiles: TileLayer::default(),
            marker_icon: MarkerIcon::default(),
        }
    }
}
