//! The tiled map view and its view-state synchronization.
//!
//! [`HeatmapMap`] owns the camera (center, zoom, viewport) over one
//! dataset's tile pyramid. Every confirmed movement recomputes the
//! visible data window in matrix indices at the fixed data zoom level and
//! notifies the registered listener exactly once; sparklines and side
//! panels treat that event as the single source of truth.

pub mod crs;
pub mod tiles;

use eyre::{ensure, Result};
use glam::DVec2;
use tracing::debug;

use crate::data_types::{clamp_bounds, LatLng, ViewState, ZoomPyramid};

use crs::CrsSimple;

pub use tiles::{TileCoord, TileLayer, TileLayerOptions, TILE_SIZE};

pub type ViewListener = Box<dyn FnMut(&ViewState) + Send>;

pub struct HeatmapMap {
    pyramid: ZoomPyramid,
    viewport: DVec2,
    center: LatLng,
    zoom: f64,
    listener: Option<ViewListener>,
}

impl HeatmapMap {
    pub fn new(pyramid: ZoomPyramid, viewport_width: f64, viewport_height: f64) -> Result<Self> {
        ensure!(
            viewport_width > 0.0 && viewport_height > 0.0,
            "degenerate viewport {}x{}",
            viewport_width,
            viewport_height
        );
        Ok(Self {
            pyramid,
            viewport: DVec2::new(viewport_width, viewport_height),
            center: LatLng::default(),
            zoom: (pyramid.min_zoom + 1) as f64,
            listener: None,
        })
    }

    /// Registers the single view listener. Call before `mount` so the
    /// initial view is delivered too.
    pub fn on_view_changed(&mut self, listener: ViewListener) {
        self.listener = Some(listener);
    }

    /// Deregisters the listener. After this returns no event is delivered,
    /// regardless of later movement; call on every unmount path before the
    /// owning component is torn down.
    pub fn unmount(&mut self) {
        self.listener = None;
    }

    /// Brings the map up: restores a persisted camera when one exists,
    /// otherwise fits the full data bounds and centers on their midpoint.
    /// Emits the initial view state.
    pub fn mount(&mut self, persisted: Option<(LatLng, f64)>) {
        match persisted {
            Some((center, zoom)) => {
                self.center = center;
                self.zoom = self.clamp_zoom(zoom.trunc());
            }
            None => self.fit_data_bounds(),
        }
        debug!(zoom = self.zoom, "heatmap view mounted");
        self.emit();
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn viewport(&self) -> DVec2 {
        self.viewport
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = self.clamp_zoom(zoom);
        self.emit();
    }

    /// Pans by a screen-pixel delta at the current zoom.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let center_px = CrsSimple::project(self.center, self.zoom);
        self.center = CrsSimple::unproject(center_px + DVec2::new(dx, dy), self.zoom);
        self.emit();
    }

    /// Zooms keeping the center fixed.
    pub fn zoom_to(&mut self, zoom: f64) {
        self.zoom = self.clamp_zoom(zoom);
        self.emit();
    }

    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64) {
        if viewport_width > 0.0 && viewport_height > 0.0 {
            self.viewport = DVec2::new(viewport_width, viewport_height);
            self.emit();
        }
    }

    /// The current view state: viewport corners projected to matrix
    /// indices at the fixed data zoom, clamped into the matrix extent.
    /// Data coordinates never depend on the current zoom level.
    pub fn view_state(&self) -> ViewState {
        let half = self.viewport * 0.5;
        let center_px = CrsSimple::project(self.center, self.zoom);
        let nw = CrsSimple::rescale(center_px - half, self.zoom, self.pyramid.data_zoom as f64);
        let se = CrsSimple::rescale(center_px + half, self.zoom, self.pyramid.data_zoom as f64);
        let data_bounds = clamp_bounds(
            [nw.x, nw.y, se.x, se.y],
            self.pyramid.cols() as f64,
            self.pyramid.rows() as f64,
        );
        ViewState {
            data_bounds,
            screen_bounds: [0.0, 0.0, self.viewport.x, self.viewport.y],
            zoom: self.zoom,
            center: self.center,
        }
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp((self.pyramid.min_zoom + 1) as f64, self.pyramid.max_zoom as f64)
    }

    /// Largest zoom at which the whole matrix fits the viewport, centered
    /// on the matrix midpoint.
    fn fit_data_bounds(&mut self) {
        let cols = self.pyramid.cols() as f64;
        let rows = self.pyramid.rows() as f64;
        let data_zoom = self.pyramid.data_zoom as f64;

        let sw = CrsSimple::unproject(DVec2::new(0.0, rows), data_zoom);
        let ne = CrsSimple::unproject(DVec2::new(cols, 0.0), data_zoom);
        self.center = LatLng {
            lat: (sw.lat + ne.lat) * 0.5,
            lng: (sw.lng + ne.lng) * 0.5,
        };

        let fit = (self.viewport.x / cols).min(self.viewport.y / rows).log2();
        self.zoom = self.clamp_zoom((data_zoom + fit).floor());
        debug!(zoom = self.zoom, "fitted full data bounds");
    }

    fn emit(&mut self) {
        let state = self.view_state();
        if let Some(listener) = &mut self.listener {
            listener(&state);
        }
    }
}
