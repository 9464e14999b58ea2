//! Sparkline strips: 1D summaries of the attribute window the heatmap
//! currently shows.
//!
//! Painters draw buckets along the long axis of the strip, with the value
//! dimension across it. The native orientation is vertical (a row strip at
//! the side of the map); horizontal strips rotate the surface before
//! painting, so no painter needs a second code path.

pub mod bars;
pub mod categorical;
pub mod heatmap;
pub mod text;

use std::f32::consts::FRAC_PI_2;
use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::aggregation::{bucket_by_pixel, PixelBuckets};
use crate::data_types::Attribute;
use crate::scheduler::PaintTask;
use crate::surface::{text_style, Surface};

/// Visual mode of a sparkline strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SparklineMode {
    Text,
    Bars,
    Box,
    Categorical,
    Stacked,
    Heatmap,
    Flame,
    Icicle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SparklineSettings {
    pub orientation: Orientation,
    /// Log-project the quantitative color/length scale.
    pub log_scale: bool,
    /// Enable the percentile clip below.
    pub clip: bool,
    /// Clip bounds in percent of the min..max span.
    pub lower_bound: f32,
    pub upper_bound: f32,
}

impl Default for SparklineSettings {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            log_scale: false,
            clip: false,
            lower_bound: 0.0,
            upper_bound: 100.0,
        }
    }
}

/// Geometry handed to every painter: `width` across the strip, `height`
/// along it, buckets advancing by `pixel_span` starting at `offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    pub pixel_span: f32,
    pub offset: f32,
}

/// One configured sparkline paint. Built fresh whenever the view state or
/// settings change and handed to the paint scheduler.
#[derive(Clone, Debug)]
pub struct Sparkline {
    attr: Arc<Attribute>,
    mode: SparklineMode,
    settings: SparklineSettings,
    label: Option<String>,
    data_range: (f64, f64),
}

impl Sparkline {
    pub fn new(attr: Arc<Attribute>, mode: SparklineMode, settings: SparklineSettings) -> Self {
        let len = attr.len() as f64;
        Self {
            attr,
            mode,
            settings,
            label: None,
            data_range: (0.0, len),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Restrict to the visible window, in attribute indices. Fractional
    /// and out-of-range endpoints are fine.
    pub fn with_data_range(mut self, lo: f64, hi: f64) -> Self {
        self.data_range = (lo, hi);
        self
    }

    pub fn mode(&self) -> SparklineMode {
        self.mode
    }

    /// Paints the whole strip onto `surface`.
    pub fn paint_onto(&self, surface: &mut dyn Surface) {
        let (w, h) = (surface.width(), surface.height());
        let rotated = self.settings.orientation == Orientation::Horizontal;

        if !self.attr.is_empty() && !self.attr.all_missing() {
            let (cross, along) = if rotated { (h, w) } else { (w, h) };
            if rotated {
                surface.save();
                surface.translate(0.0, h);
                surface.rotate(-FRAC_PI_2);
            }

            let buckets = bucket_by_pixel(self.attr.len(), self.data_range, (0.0, along as f64));
            if !buckets.is_empty() {
                let frame = Frame {
                    width: cross,
                    height: along,
                    pixel_span: (buckets.pixels_per_datum.floor() as f32).max(1.0),
                    offset: buckets.offset as f32,
                };
                self.dispatch(surface, frame, &buckets);
            }

            if rotated {
                surface.restore();
            }
        }

        if let Some(label) = &self.label {
            paint_label(surface, h, label);
        }
    }

    fn dispatch(&self, surface: &mut dyn Surface, frame: Frame, buckets: &PixelBuckets) {
        let attr = self.attr.as_ref();
        let settings = &self.settings;
        match self.mode {
            SparklineMode::Text => text::TextPainter.paint(surface, frame, buckets, attr),
            SparklineMode::Bars => bars::BarPainter.paint(surface, frame, buckets, attr, settings),
            SparklineMode::Box => bars::BoxPainter.paint(surface, frame, buckets, attr, settings),
            SparklineMode::Categorical => {
                categorical::CategoricalPainter.paint(surface, frame, buckets, attr)
            }
            SparklineMode::Stacked => {
                categorical::StackedPainter.paint(surface, frame, buckets, attr)
            }
            SparklineMode::Heatmap => {
                heatmap::HeatmapPainter.paint(surface, frame, buckets, attr, settings)
            }
            SparklineMode::Flame => heatmap::FlamePainter { inverted: false }
                .paint(surface, frame, buckets, attr, settings),
            SparklineMode::Icicle => heatmap::FlamePainter { inverted: true }
                .paint(surface, frame, buckets, attr, settings),
        }
    }

    /// Adapts this sparkline into scheduler paint work. Sparklines are
    /// never animated; a changed view produces a new task via
    /// `replace_paint` instead.
    pub fn into_task(self) -> impl PaintTask {
        move |surface: &mut dyn Surface| {
            self.paint_onto(surface);
            false
        }
    }
}

/// Mean over the finite values of one bucket, `NaN` when it has none.
pub(crate) fn bucket_mean(attr: &Attribute, range: Range<usize>) -> f32 {
    let mut sum = 0.0f64;
    let mut n = 0usize;
    for i in range {
        if let Some(v) = attr.float_at(i) {
            if v.is_finite() {
                sum += v as f64;
                n += 1;
            }
        }
    }
    if n == 0 {
        f32::NAN
    } else {
        (sum / n as f64) as f32
    }
}

/// Attribute-name overlay in the strip corner.
fn paint_label(surface: &mut dyn Surface, height: f32, label: &str) {
    text_style(surface);
    let size = 12.0;
    surface.set_font_size(size);
    surface.draw_text(label, 6.0, (height + size) * 0.5);
}
