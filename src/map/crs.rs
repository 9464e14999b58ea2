//! The flat coordinate reference system of the tile pyramid.
//!
//! Same conventions as a slippy map in "simple" CRS: projected pixel
//! coordinates are `(lng, -lat)` scaled by `2^zoom`, so latitude grows
//! upward while pixel y grows downward, and every zoom level doubles the
//! world.

use glam::DVec2;

use crate::data_types::LatLng;

pub struct CrsSimple;

impl CrsSimple {
    pub fn scale(zoom: f64) -> f64 {
        2f64.powf(zoom)
    }

    /// Map coordinate to pixel coordinate at `zoom`.
    pub fn project(latlng: LatLng, zoom: f64) -> DVec2 {
        let s = Self::scale(zoom);
        DVec2::new(latlng.lng * s, -latlng.lat * s)
    }

    /// Pixel coordinate at `zoom` back to a map coordinate.
    pub fn unproject(point: DVec2, zoom: f64) -> LatLng {
        let s = Self::scale(zoom);
        LatLng {
            lat: -point.y / s,
            lng: point.x / s,
        }
    }

    /// Rescales a pixel coordinate from one zoom level to another.
    pub fn rescale(point: DVec2, from_zoom: f64, to_zoom: f64) -> DVec2 {
        point * (Self::scale(to_zoom) / Self::scale(from_zoom))
    }
}
