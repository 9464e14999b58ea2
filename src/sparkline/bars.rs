use crate::aggregation::PixelBuckets;
use crate::colors::{clip_scale, Color};
use crate::data_types::{finite_min_max, format_value, Attribute};
use crate::surface::{text_style, Surface};

use super::{bucket_mean, Frame, SparklineSettings};

/// One bar per bucket, length proportional to the bucket mean.
pub struct BarPainter;

impl BarPainter {
    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        frame: Frame,
        buckets: &PixelBuckets,
        attr: &Attribute,
        settings: &SparklineSettings,
    ) {
        let means: Vec<f32> = buckets
            .occupied()
            .map(|range| bucket_mean(attr, range))
            .collect();
        let Some((mut min, mut max)) = finite_min_max(&means) else {
            return;
        };
        if settings.clip {
            (min, max) = clip_scale(min, max, settings.lower_bound, settings.upper_bound);
        }
        // snap the baseline to zero for mildly-off-zero data, so bars are
        // not exaggerated
        if min >= 0.0 && min < 0.5 * max {
            min = 0.0;
        }
        let span = max - min;
        let scale = if span > 0.0 { frame.width / span } else { 0.0 };

        surface.set_fill_color(Color::DARK_GREY);
        let mut y = frame.offset;
        for mean in &means {
            if mean.is_finite() {
                let len = (mean.clamp(min, max) - min) * scale;
                if len > 0.0 {
                    surface.fill_rect(0.0, y, len, frame.pixel_span);
                }
            }
            y += frame.pixel_span;
        }

        paint_min_max_labels(surface, frame, min, max);
    }
}

#[derive(Clone, Copy, Debug)]
struct BoxStats {
    min: f32,
    q1: f32,
    mean: f32,
    q3: f32,
    max: f32,
}

fn bucket_stats(attr: &Attribute, range: std::ops::Range<usize>) -> Option<BoxStats> {
    let mut values: Vec<f32> = range
        .filter_map(|i| attr.float_at(i))
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return None;
    }
    values.sort_unstable_by(|a, b| a.total_cmp(b));
    let n = values.len();
    let mean = (values.iter().map(|&v| v as f64).sum::<f64>() / n as f64) as f32;
    Some(BoxStats {
        min: values[0],
        q1: values[n / 4],
        mean,
        q3: values[(3 * n) / 4].min(values[n - 1]),
        max: values[n - 1],
    })
}

/// Layered per-bucket box summary: max, third quartile, mean, first
/// quartile and min bars painted longest first.
pub struct BoxPainter;

const BOX_MAX: Color = Color::rgb(0xee, 0xcc, 0xcc);
const BOX_Q3: Color = Color::rgb(0xee, 0x66, 0x44);
const BOX_MEAN: Color = Color::BLACK;
const BOX_Q1: Color = Color::rgb(0x44, 0x44, 0xaa);
const BOX_MIN: Color = Color::rgb(0x66, 0x66, 0x88);

impl BoxPainter {
    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        frame: Frame,
        buckets: &PixelBuckets,
        attr: &Attribute,
        settings: &SparklineSettings,
    ) {
        let stats: Vec<Option<BoxStats>> = buckets
            .occupied()
            .map(|range| bucket_stats(attr, range))
            .collect();
        let lows: Vec<f32> = stats.iter().flatten().map(|s| s.min).collect();
        let highs: Vec<f32> = stats.iter().flatten().map(|s| s.max).collect();
        let (Some((mut min, _)), Some((_, mut max))) =
            (finite_min_max(&lows), finite_min_max(&highs))
        else {
            return;
        };
        if settings.clip {
            (min, max) = clip_scale(min, max, settings.lower_bound, settings.upper_bound);
        }
        if min >= 0.0 && min < 0.5 * max {
            min = 0.0;
        }
        let span = max - min;
        let scale = if span > 0.0 { frame.width / span } else { 0.0 };
        let bar = |v: f32| (v.clamp(min, max) - min) * scale;

        let mut y = frame.offset;
        for s in &stats {
            if let Some(s) = s {
                for (value, color) in [
                    (s.max, BOX_MAX),
                    (s.q3, BOX_Q3),
                    (s.mean, BOX_MEAN),
                    (s.q1, BOX_Q1),
                    (s.min, BOX_MIN),
                ] {
                    let len = bar(value);
                    if len > 0.0 {
                        surface.set_fill_color(color);
                        surface.fill_rect(0.0, y, len, frame.pixel_span);
                    }
                }
            }
            y += frame.pixel_span;
        }

        paint_min_max_labels(surface, frame, min, max);
    }
}

/// Scale annotation at the two ends of the strip.
pub(super) fn paint_min_max_labels(surface: &mut dyn Surface, frame: Frame, min: f32, max: f32) {
    text_style(surface);
    surface.set_font_size(10.0);
    surface.draw_text(&format_value(min), 2.0, frame.height - 2.0);
    surface.draw_text(&format_value(max), 2.0, 12.0);
}
