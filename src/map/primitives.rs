use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerId {
    Notes,
    Route,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub center: Coordinates,
    pub zoom: u8,
}

/// Pixel padding for fit-to-bounds, `[x, y]`.
pub type Padding = [u32; 2];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub title: String,
    pub subtitle: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
}

impl Style {
    pub fn color(color: &str) -> Self {
        Self {
            color: color.into(),
            ..Self::default()
        }
    }

    pub fn weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn dashed(mut self, pattern: &str) -> Self {
        self.dash_array = Some(pattern.into());
        self
    }

    pub fn fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = Some(opacity);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Marker {
        position: Coordinates,
        popup: Popup,
    },
    Polyline {
        points: Vec<Coordinates>,
        style: Style,
    },
    Circle {
        center: Coordinates,
        radius_meters: f64,
        style: Style,
    },
}
