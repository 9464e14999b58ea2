//! Tile source configuration and visible-tile enumeration.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::data_types::{LatLng, ZoomPyramid};

use super::crs::CrsSimple;

/// Edge length of one pyramid tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayerOptions {
    /// How many pyramid levels exist below native resolution. Above
    /// `max_zoom - native_pyramid_depth` the server has no finer tiles and
    /// the client upscales instead of requesting them.
    pub native_pyramid_depth: u32,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            native_pyramid_depth: 8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

/// The pre-rendered tile source of one dataset.
#[derive(Clone, Debug)]
pub struct TileLayer {
    project: String,
    dataset: String,
    pyramid: ZoomPyramid,
    options: TileLayerOptions,
}

impl TileLayer {
    pub fn new(
        project: impl Into<String>,
        dataset: impl Into<String>,
        pyramid: ZoomPyramid,
    ) -> Self {
        Self {
            project: project.into(),
            dataset: dataset.into(),
            pyramid,
            options: TileLayerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TileLayerOptions) -> Self {
        self.options = options;
        self
    }

    /// Never request the degenerate single-tile root level.
    pub fn min_zoom(&self) -> u32 {
        self.pyramid.min_zoom + 1
    }

    pub fn max_zoom(&self) -> u32 {
        self.pyramid.max_zoom
    }

    /// Finest level with real tiles behind it.
    pub fn max_native_zoom(&self) -> u32 {
        self.pyramid
            .max_zoom
            .saturating_sub(self.options.native_pyramid_depth)
            .max(self.min_zoom())
    }

    pub fn tile_url(&self, tile: TileCoord) -> String {
        format!(
            "/loom/{}/{}/tiles/{}/{}_{}.png",
            self.project, self.dataset, tile.z, tile.x, tile.y
        )
    }

    /// Pixel size of the whole matrix at `zoom`.
    fn world_size(&self, zoom: u32) -> DVec2 {
        let f = CrsSimple::scale(zoom as f64) / CrsSimple::scale(self.pyramid.data_zoom as f64);
        DVec2::new(
            self.pyramid.full_zoom_width as f64,
            self.pyramid.full_zoom_height as f64,
        ) * f
    }

    /// The tiles covering a viewport of `viewport` device pixels centered
    /// on `center` at `zoom`. Requests are clamped to the pyramid extent
    /// and never issued above the native resolution; a viewer zoomed past
    /// it upscales these tiles.
    pub fn visible_tiles(&self, center: LatLng, zoom: f64, viewport: DVec2) -> Vec<TileCoord> {
        let z = (zoom.round() as i64)
            .clamp(self.min_zoom() as i64, self.max_zoom() as i64) as u32;
        let z = z.min(self.max_native_zoom());

        // viewport corners in pixel space at the request level
        let center_px = CrsSimple::project(center, zoom);
        let nw = CrsSimple::rescale(center_px - viewport * 0.5, zoom, z as f64);
        let se = CrsSimple::rescale(center_px + viewport * 0.5, zoom, z as f64);

        let world = self.world_size(z);
        let max_tx = (world.x / TILE_SIZE).ceil() as i64;
        let max_ty = (world.y / TILE_SIZE).ceil() as i64;

        let tx0 = ((nw.x / TILE_SIZE).floor() as i64).clamp(0, max_tx);
        let tx1 = ((se.x / TILE_SIZE).ceil() as i64).clamp(0, max_tx);
        let ty0 = ((nw.y / TILE_SIZE).floor() as i64).clamp(0, max_ty);
        let ty1 = ((se.y / TILE_SIZE).ceil() as i64).clamp(0, max_ty);

        let mut tiles = Vec::with_capacity(((tx1 - tx0) * (ty1 - ty0)).max(0) as usize);
        for ty in ty0..ty1 {
            for tx in tx0..tx1 {
                tiles.push(TileCoord {
                    z,
                    x: tx as u32,
                    y: ty as u32,
                });
            }
        }
        tiles
    }
}
