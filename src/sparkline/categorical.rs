use std::collections::HashMap;

use crate::aggregation::PixelBuckets;
use crate::colors::{Color, ColorMapper};
use crate::data_types::{n_most_frequent, AttrData, Attribute};
use crate::surface::Surface;

use super::Frame;

/// Category identity of entry `i`: the code for indexed data, the exact
/// bit pattern for finite floats, `None` for missing.
fn category_key(attr: &Attribute, i: usize) -> Option<u64> {
    match &attr.data {
        AttrData::Categorical { codes, .. } => match codes.get(i) {
            Some(&c) if c > 0 => Some(c as u64),
            _ => None,
        },
        AttrData::Float(values) => {
            let v = *values.get(i)?;
            v.is_finite().then(|| v.to_bits() as u64)
        }
    }
}

fn code_at(attr: &Attribute, i: usize) -> u32 {
    match &attr.data {
        AttrData::Categorical { codes, .. } => codes.get(i).copied().unwrap_or(0),
        AttrData::Float(_) => 0,
    }
}

/// Presence grid: one column per frequent category, one row per bucket,
/// a cell is filled when the bucket contains the category.
pub struct CategoricalPainter;

const LABEL_BLUE: Color = Color::rgb(0x00, 0x00, 0xff);

impl CategoricalPainter {
    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        frame: Frame,
        buckets: &PixelBuckets,
        attr: &Attribute,
    ) {
        // one category column per ten pixels of strip width
        let columns = ((frame.width / 10.0) as usize).max(1);

        let mut keys: Vec<u64> = Vec::new();
        let mut labels: HashMap<u64, String> = HashMap::new();
        for range in buckets.occupied() {
            for i in range {
                if let Some(key) = category_key(attr, i) {
                    if !labels.contains_key(&key) {
                        labels.insert(key, attr.display_at(i).unwrap_or_default());
                    }
                    keys.push(key);
                }
            }
        }
        if keys.is_empty() {
            return;
        }
        let top = n_most_frequent(keys.iter().copied(), columns);

        let cwidth = frame.width / columns as f32;
        for (ci, key) in top.iter().enumerate() {
            let x = ci as f32 * cwidth;
            surface.set_fill_color(Color::GREY);
            let mut y = frame.offset;
            for range in buckets.occupied() {
                let hit = range.clone().any(|i| category_key(attr, i) == Some(*key));
                if hit {
                    surface.fill_rect(x, y, cwidth, frame.pixel_span);
                }
                y += frame.pixel_span;
            }

            if let Some(label) = labels.get(key) {
                surface.save();
                surface.rotate(std::f32::consts::FRAC_PI_2);
                surface.set_font_size((cwidth - 1.0).clamp(4.0, 12.0));
                surface.set_text_style(LABEL_BLUE, Color::WHITE);
                surface.draw_text(label, 0.0, -x - 2.0);
                surface.restore();
            }
        }
    }
}

/// Each bucket as proportional category slices across the strip, sorted so
/// equal categories form contiguous runs.
pub struct StackedPainter;

impl StackedPainter {
    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        frame: Frame,
        buckets: &PixelBuckets,
        attr: &Attribute,
    ) {
        let visible = buckets.occupied().flatten().map(|i| code_at(attr, i));
        let mapper = ColorMapper::categorical(visible);

        let mut y = frame.offset;
        for range in buckets.occupied() {
            let mut slice: Vec<u32> = range.map(|i| code_at(attr, i)).collect();
            slice.sort_unstable();
            let l = slice.len() as f32;
            let mut j = 0;
            while j < slice.len() {
                let mut k = j + 1;
                while k < slice.len() && slice[k] == slice[j] {
                    k += 1;
                }
                let x = frame.width * j as f32 / l;
                let x1 = frame.width * k as f32 / l;
                surface.set_fill_color(mapper.color_for_code(slice[j]));
                surface.fill_rect(x, y, x1 - x, frame.pixel_span);
                j = k;
            }
            y += frame.pixel_span;
        }
    }
}
