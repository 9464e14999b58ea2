//! View state shared between the map, the sparklines and the embedder.

use eyre::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Map-projection coordinate, leaflet convention (`lat` grows upward,
/// `lng` rightward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Describes the pre-rendered tile pyramid of one dataset.
///
/// `data_zoom` is the level where one tile pixel equals one matrix cell;
/// `full_zoom_width`/`full_zoom_height` are the matrix dimensions in pixels
/// at that level, so they double with every level above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomPyramid {
    pub min_zoom: u32,
    pub data_zoom: u32,
    pub max_zoom: u32,
    pub full_zoom_width: u32,
    pub full_zoom_height: u32,
}

impl ZoomPyramid {
    pub fn new(
        min_zoom: u32,
        data_zoom: u32,
        max_zoom: u32,
        full_zoom_width: u32,
        full_zoom_height: u32,
    ) -> Result<Self> {
        ensure!(
            min_zoom <= data_zoom && data_zoom <= max_zoom,
            "zoom levels out of order: min {} data {} max {}",
            min_zoom,
            data_zoom,
            max_zoom
        );
        ensure!(
            full_zoom_width > 0 && full_zoom_height > 0,
            "empty pyramid: {}x{}",
            full_zoom_width,
            full_zoom_height
        );
        Ok(Self {
            min_zoom,
            data_zoom,
            max_zoom,
            full_zoom_width,
            full_zoom_height,
        })
    }

    /// Matrix width in columns (cells).
    pub fn cols(&self) -> u32 {
        self.full_zoom_width
    }

    /// Matrix height in rows (genes).
    pub fn rows(&self) -> u32 {
        self.full_zoom_height
    }
}

/// The single source of truth for what is visible, emitted on every
/// confirmed map movement.
///
/// `data_bounds` is `[x0, y0, x1, y1]` in matrix indices at `data_zoom`,
/// already clamped into `[0, 0, cols, rows]`. `screen_bounds` is the same
/// corner layout in device pixels of the mounted viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub data_bounds: [f64; 4],
    pub screen_bounds: [f64; 4],
    pub zoom: f64,
    pub center: LatLng,
}

impl ViewState {
    /// Serializes for persistence (URL state, session restore).
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(encoded: &str) -> Result<Self> {
        Ok(serde_json::from_str(encoded)?)
    }

    /// Visible column index window, for the column sparkline.
    pub fn col_range(&self) -> (f64, f64) {
        (self.data_bounds[0], self.data_bounds[2])
    }

    /// Visible row index window, for the row sparkline.
    pub fn row_range(&self) -> (f64, f64) {
        (self.data_bounds[1], self.data_bounds[3])
    }
}

/// Clamps raw projected bounds component-wise into `[0, 0, cols, rows]`.
pub fn clamp_bounds(bounds: [f64; 4], cols: f64, rows: f64) -> [f64; 4] {
    [
        bounds[0].clamp(0.0, cols),
        bounds[1].clamp(0.0, rows),
        bounds[2].clamp(0.0, cols),
        bounds[3].clamp(0.0, rows),
    ]
}
