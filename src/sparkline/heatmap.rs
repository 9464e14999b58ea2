use crate::aggregation::PixelBuckets;
use crate::colors::{clip_scale, Color, ColorMapper};
use crate::data_types::Attribute;
use crate::surface::Surface;

use super::bars::paint_min_max_labels;
use super::{bucket_mean, Frame, SparklineSettings};

/// The color scale shared by the heatmap and flame painters. Built from
/// the attribute's global range, never from the visible window, so colors
/// stay stable while panning.
fn scale_for(attr: &Attribute, settings: &SparklineSettings) -> Option<(f32, f32)> {
    let (mut min, mut max) = (attr.min?, attr.max?);
    if settings.clip {
        (min, max) = clip_scale(min, max, settings.lower_bound, settings.upper_bound);
    }
    Some((min, max))
}

/// One full-width color band per bucket, colored by the bucket mean.
pub struct HeatmapPainter;

impl HeatmapPainter {
    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        frame: Frame,
        buckets: &PixelBuckets,
        attr: &Attribute,
        settings: &SparklineSettings,
    ) {
        let Some((min, max)) = scale_for(attr, settings) else {
            return;
        };
        let mapper = ColorMapper::quantitative(min, max, settings.log_scale);

        let mut y = frame.offset;
        for range in buckets.occupied() {
            let mean = bucket_mean(attr, range);
            surface.set_fill_color(mapper.color_for_value(mean));
            surface.fill_rect(0.0, y, frame.width, frame.pixel_span);
            y += frame.pixel_span;
        }

        paint_min_max_labels(surface, frame, min, max);
    }
}

/// Sorted per-bucket gradient over most of the strip width plus a thin
/// max-value band, so sparse expression stays visible. `inverted` mirrors
/// the gradient for the icicle variant.
pub struct FlamePainter {
    pub inverted: bool,
}

impl FlamePainter {
    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        frame: Frame,
        buckets: &PixelBuckets,
        attr: &Attribute,
        settings: &SparklineSettings,
    ) {
        let Some((min, max)) = scale_for(attr, settings) else {
            return;
        };
        let mapper = ColorMapper::quantitative(min, max, settings.log_scale);

        // rounding makes buckets come in two sizes; pad every gradient to
        // the largest so small windows do not degenerate
        let bin_size = buckets.occupied().map(|r| r.len()).max().unwrap_or(0);
        if bin_size == 0 {
            return;
        }

        let flame_w = (frame.width * 0.875).floor();
        let strip_w = frame.width - flame_w - 1.0;

        let mut y = frame.offset;
        for range in buckets.occupied() {
            let mut values: Vec<f32> = range
                .filter_map(|i| attr.float_at(i))
                .filter(|v| v.is_finite())
                .collect();
            values.sort_unstable_by(|a, b| a.total_cmp(b));
            let l = values.len();
            let pad = bin_size - l;

            let mut j = 0;
            while j < l {
                let mut k = j + 1;
                while k < l && values[k] == values[j] {
                    k += 1;
                }
                let x0 = flame_w * (j + pad) as f32 / bin_size as f32;
                let x1 = flame_w * (k + pad) as f32 / bin_size as f32;
                surface.set_fill_color(mapper.color_for_value(values[j]));
                if self.inverted {
                    surface.fill_rect(flame_w - x1, y, x1 - x0, frame.pixel_span);
                } else {
                    surface.fill_rect(x0, y, x1 - x0, frame.pixel_span);
                }
                j = k;
            }

            // max-value band; values are sorted, so the last is the max
            if l > 0 && strip_w > 0.0 {
                surface.set_fill_color(mapper.color_for_value(values[l - 1]));
                surface.fill_rect(flame_w, y, strip_w, frame.pixel_span);
            }
            y += frame.pixel_span;
        }

        // faded divider between gradient and max band
        if strip_w > 0.0 {
            surface.set_fill_color(Color::GREY);
            surface.set_alpha(0.25);
            surface.fill_rect(flame_w, 0.0, 1.0, frame.height);
            surface.set_alpha(1.0);
        }
    }
}
