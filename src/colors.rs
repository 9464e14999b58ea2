//! Color palettes and value-to-color mapping.
//!
//! Palette index 0 is white and reserved for zero/missing entries in both
//! palettes, so sparse data reads as background.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data_types::n_most_frequent;
use crate::fastlog::log_project;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const GREY: Color = Color::rgb(0x80, 0x80, 0x80);
    pub const DARK_GREY: Color = Color::rgb(0x40, 0x40, 0x40);
}

/// Category colors from d3's ordinal scales, most common category first.
pub const CATEGORY20: [Color; 21] = [
    Color::WHITE, // zeros / missing
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
    Color::rgb(0x9e, 0xda, 0xe5),
    Color::rgb(0xae, 0xc7, 0xe8),
    Color::rgb(0xff, 0xbb, 0x78),
    Color::rgb(0x98, 0xdf, 0x8a),
    Color::rgb(0xff, 0x98, 0x96),
    Color::rgb(0xc5, 0xb0, 0xd5),
    Color::rgb(0xc4, 0x9c, 0x94),
    Color::rgb(0xf7, 0xb6, 0xd2),
    Color::rgb(0xc7, 0xc7, 0xc7),
    Color::rgb(0xdb, 0xdb, 0x8d),
];

/// Continuous heat colors from color brewer (YlOrRd).
pub const SOLAR9: [Color; 10] = [
    Color::WHITE, // zeros / missing
    Color::rgb(0xff, 0xff, 0xcc),
    Color::rgb(0xff, 0xed, 0xa0),
    Color::rgb(0xfe, 0xd9, 0x76),
    Color::rgb(0xfe, 0xb2, 0x4c),
    Color::rgb(0xfd, 0x8d, 0x3c),
    Color::rgb(0xfc, 0x4e, 0x2a),
    Color::rgb(0xe3, 0x1a, 0x1c),
    Color::rgb(0xbd, 0x00, 0x26),
    Color::rgb(0x80, 0x00, 0x26),
];

/// Maps attribute values to palette colors. Built once per paint so the
/// scale stays consistent across the whole strip and its legend.
#[derive(Clone, Debug)]
pub enum ColorMapper {
    /// Top-ranked category codes get `CATEGORY20` colors, everything else
    /// falls back to the missing color.
    Categorical { ranks: HashMap<u32, usize> },
    /// Linear or log-projected position in `[min, max]` through `SOLAR9`.
    Quantitative { min: f32, max: f32, log: bool },
}

impl ColorMapper {
    /// Ranks the most frequent codes of the visible window; at most the
    /// palette size minus the reserved missing slot.
    pub fn categorical(codes: impl Iterator<Item = u32>) -> Self {
        let top = n_most_frequent(codes.filter(|&c| c != 0), CATEGORY20.len() - 1);
        let ranks = top
            .into_iter()
            .enumerate()
            .map(|(rank, code)| (code, rank + 1))
            .collect();
        ColorMapper::Categorical { ranks }
    }

    /// Quantitative scale over `[min, max]`. When `log` is set the scale is
    /// projected through [`log_project`] once, here, so repaints and
    /// legends agree.
    pub fn quantitative(min: f32, max: f32, log: bool) -> Self {
        ColorMapper::Quantitative { min, max, log }
    }

    pub fn color_for_code(&self, code: u32) -> Color {
        match self {
            ColorMapper::Categorical { ranks } => {
                CATEGORY20[ranks.get(&code).copied().unwrap_or(0)]
            }
            ColorMapper::Quantitative { .. } => self.color_for_value(code as f32),
        }
    }

    pub fn color_for_value(&self, value: f32) -> Color {
        match self {
            ColorMapper::Categorical { .. } => {
                if value.is_finite() && value > 0.0 {
                    self.color_for_code(value as u32)
                } else {
                    SOLAR9[0]
                }
            }
            ColorMapper::Quantitative { min, max, log } => {
                if !value.is_finite() || value == 0.0 {
                    return SOLAR9[0];
                }
                let (span, pos) = if *log {
                    (log_project(max - min), log_project(value - min))
                } else {
                    (max - min, value - min)
                };
                if span <= 0.0 || !span.is_finite() {
                    return SOLAR9[0];
                }
                let t = (pos / span).clamp(0.0, 1.0);
                let idx = 1 + (t * (SOLAR9.len() - 2) as f32) as usize;
                SOLAR9[idx.min(SOLAR9.len() - 1)]
            }
        }
    }
}

/// Percentile clip of a `[min, max]` scale: bounds are percent positions
/// in the span, `0..=100`. Returns the clipped scale.
pub fn clip_scale(min: f32, max: f32, lower_bound: f32, upper_bound: f32) -> (f32, f32) {
    let delta = max - min;
    let mut clip_min = min;
    let mut clip_max = max;
    if lower_bound > 0.0 {
        clip_min = min + lower_bound * delta / 100.0;
    }
    if upper_bound < 100.0 {
        clip_max = min + upper_bound * delta / 100.0;
    }
    (clip_min, clip_max)
}
