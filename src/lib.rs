//! Rendering core of the Loom dataset viewer: the tiled heatmap view-state
//! synchronizer, the sparkline aggregator and painters, and the budgeted
//! async paint scheduler that ties them together.

pub mod aggregation;
pub mod colors;
pub mod data_types;
pub mod fastlog;
pub mod map;
pub mod scheduler;
pub mod sparkline;
pub mod surface;

pub use data_types::{AttrData, Attribute, LatLng, ViewState, ZoomPyramid};
pub use map::{HeatmapMap, TileLayer};
pub use scheduler::{AsyncPainter, PaintTask, RenderQueue};
pub use sparkline::{Sparkline, SparklineMode, SparklineSettings};
pub use surface::{DisplayList, Surface};
