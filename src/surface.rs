//! The 2D paint surface seam.
//!
//! Painters draw through the [`Surface`] trait, which mirrors the small set
//! of canvas primitives the viewer uses. [`DisplayList`] is the recording
//! implementation: the embedder replays its commands onto a real backend,
//! and tests inspect them directly. Styling is resolved at record time, so
//! every command carries the color and font it was issued with.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::colors::Color;

#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    Clear,
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
        alpha: f32,
    },
    /// Outlined text: stroke first, fill on top.
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        fill: Color,
        stroke: Color,
    },
    Save,
    Restore,
    Translate {
        dx: f32,
        dy: f32,
    },
    Rotate {
        radians: f32,
    },
}

pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn clear(&mut self);
    fn set_fill_color(&mut self, color: Color);
    fn set_text_style(&mut self, fill: Color, stroke: Color);
    fn set_font_size(&mut self, size: f32);
    fn set_alpha(&mut self, alpha: f32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn draw_text(&mut self, text: &str, x: f32, y: f32);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, radians: f32);
}

/// Font-size helper matching the old canvas default of 10px.
pub fn text_size(surface: &mut dyn Surface, size: f32) {
    surface.set_font_size(size);
}

/// Default label styling: black fill with a white outline so text stays
/// readable over any strip.
pub fn text_style(surface: &mut dyn Surface) {
    surface.set_text_style(Color::BLACK, Color::WHITE);
}

/// A surface that records resolved paint commands.
#[derive(Clone, Debug)]
pub struct DisplayList {
    width: f32,
    height: f32,
    commands: Vec<PaintCommand>,
    fill: Color,
    text_fill: Color,
    text_stroke: Color,
    font_size: f32,
    alpha: f32,
}

impl DisplayList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            fill: Color::BLACK,
            text_fill: Color::BLACK,
            text_stroke: Color::WHITE,
            font_size: 10.0,
            alpha: 1.0,
        }
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<PaintCommand> {
        self.commands
    }

    /// All recorded rectangles, transform commands ignored.
    pub fn rects(&self) -> Vec<(f32, f32, f32, f32, Color)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                PaintCommand::FillRect { x, y, w, h, color, .. } => {
                    Some((*x, *y, *w, *h, *color))
                }
                _ => None,
            })
            .collect()
    }

    /// All recorded label strings.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                PaintCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DisplayList {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(PaintCommand::Clear);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_text_style(&mut self, fill: Color, stroke: Color) {
        self.text_fill = fill;
        self.text_stroke = stroke;
    }

    fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(PaintCommand::FillRect {
            x,
            y,
            w,
            h,
            color: self.fill,
            alpha: self.alpha,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(PaintCommand::Text {
            text: text.to_string(),
            x,
            y,
            size: self.font_size,
            fill: self.text_fill,
            stroke: self.text_stroke,
        });
    }

    fn save(&mut self) {
        self.commands.push(PaintCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(PaintCommand::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.commands.push(PaintCommand::Translate { dx, dy });
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(PaintCommand::Rotate { radians });
    }
}

/// A display list that can be handed to the scheduler while the embedder
/// keeps a handle to read the painted commands back out.
#[derive(Clone)]
pub struct SharedSurface {
    inner: Arc<Mutex<DisplayList>>,
}

impl SharedSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DisplayList::new(width, height))),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&DisplayList) -> R) -> R {
        f(&self.inner.lock())
    }

    pub fn snapshot(&self) -> Vec<PaintCommand> {
        self.inner.lock().commands().to_vec()
    }
}

impl Surface for SharedSurface {
    fn width(&self) -> f32 {
        self.inner.lock().width()
    }

    fn height(&self) -> f32 {
        self.inner.lock().height()
    }

    fn clear(&mut self) {
        self.inner.lock().clear();
    }

    fn set_fill_color(&mut self, color: Color) {
        self.inner.lock().set_fill_color(color);
    }

    fn set_text_style(&mut self, fill: Color, stroke: Color) {
        self.inner.lock().set_text_style(fill, stroke);
    }

    fn set_font_size(&mut self, size: f32) {
        self.inner.lock().set_font_size(size);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.inner.lock().set_alpha(alpha);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.inner.lock().fill_rect(x, y, w, h);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        self.inner.lock().draw_text(text, x, y);
    }

    fn save(&mut self) {
        self.inner.lock().save();
    }

    fn restore(&mut self) {
        self.inner.lock().restore();
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.inner.lock().translate(dx, dy);
    }

    fn rotate(&mut self, radians: f32) {
        self.inner.lock().rotate(radians);
    }
}
