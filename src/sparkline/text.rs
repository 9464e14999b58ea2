use crate::aggregation::PixelBuckets;
use crate::data_types::Attribute;
use crate::surface::{text_style, Surface};

use super::Frame;

/// Below this many pixels per label the text is unreadable and the painter
/// draws nothing at all. A hard floor, not a fade.
pub const MIN_TEXT_SPAN: f32 = 4.0;

/// One label per bucket. Only useful zoomed in, where buckets hold at most
/// one entry each.
pub struct TextPainter;

impl TextPainter {
    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        frame: Frame,
        buckets: &PixelBuckets,
        attr: &Attribute,
    ) {
        if frame.pixel_span < MIN_TEXT_SPAN {
            return;
        }
        let font_size = frame.pixel_span.min(12.0);
        surface.set_font_size(font_size);
        text_style(surface);

        let mut y = frame.offset + frame.pixel_span / 2.0 + font_size / 2.0 - 1.0;
        for range in buckets.occupied() {
            // buckets are single entries at text zoom levels, so the first
            // entry is the bucket
            if let Some(text) = attr.display_at(range.start) {
                surface.draw_text(&text, 1.0, y);
            }
            y += frame.pixel_span;
        }
    }
}
