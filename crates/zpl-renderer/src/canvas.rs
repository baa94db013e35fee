//! The label canvas and element placement.
//!
//! Elements are painted onto a white [`Pixmap`]. Black and white ink draw
//! straight onto it. Reverse ink draws the element into a transparent layer
//! first and then flips every canvas pixel the layer covers.

use image::{GrayImage, Luma};
use tiny_skia::{Color, Paint, Pixmap, PremultipliedColorU8, Transform};
use zpl_parser::{Color as LineColor, Orientation};

/// Layer alpha at or above which reverse ink flips a pixel.
const REVERSE_THRESHOLD: u8 = 128;

/// How an element changes the pixels below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    /// Draws black
    Black,
    /// Draws white
    White,
    /// Flips covered pixels between black and white
    Reverse,
}

impl Ink {
    /// Ink of a field with the given line color and reverse flag.
    pub fn for_field(color: LineColor, reverse: bool) -> Self {
        match (reverse, color) {
            (true, _) => Ink::Reverse,
            (false, LineColor::Black) => Ink::Black,
            (false, LineColor::White) => Ink::White,
        }
    }

    fn color(self) -> Color {
        match self {
            Ink::White => Color::WHITE,
            Ink::Black | Ink::Reverse => Color::BLACK,
        }
    }
}

/// Canvas area an element occupies, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Left edge
    pub left: i64,
    /// Top edge
    pub top: i64,
    /// Width
    pub width: usize,
    /// Height
    pub height: usize,
}

/// Maps element coordinates of a `width` × `height` element to its
/// orientation, keeping the rotated element at the origin. Rotations are
/// clockwise.
pub fn orientation_transform(orientation: Orientation, width: f32, height: f32) -> Transform {
    match orientation {
        Orientation::Normal => Transform::identity(),
        Orientation::Rotated => Transform::from_row(0.0, 1.0, -1.0, 0.0, height, 0.0),
        Orientation::Inverted => Transform::from_row(-1.0, 0.0, 0.0, -1.0, width, height),
        Orientation::BottomUp => Transform::from_row(0.0, -1.0, 1.0, 0.0, 0.0, width),
    }
}

/// The label image being drawn.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixmap: Pixmap,
    layer: Option<Pixmap>,
}

impl Canvas {
    /// A white canvas; `None` when the size is empty or too large.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(Color::WHITE);
        Some(Self {
            pixmap,
            layer: None,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Paints an element with `ink`.
    ///
    /// `draw` receives the pixmap to draw on and a solid paint of the ink
    /// color. Reverse ink only flips pixels inside `bounds`.
    pub fn paint<F>(&mut self, ink: Ink, bounds: Bounds, draw: F)
    where
        F: FnOnce(&mut Pixmap, &Paint<'static>),
    {
        let mut paint = Paint::default();
        paint.set_color(ink.color());

        if ink != Ink::Reverse {
            draw(&mut self.pixmap, &paint);
            return;
        }

        let layer = match self.layer.take() {
            Some(mut layer) => {
                layer.fill(Color::TRANSPARENT);
                Some(layer)
            }
            None => Pixmap::new(self.width(), self.height()),
        };
        let Some(mut layer) = layer else {
            return;
        };
        draw(&mut layer, &paint);
        self.invert(&layer, bounds);
        self.layer = Some(layer);
    }

    /// Flips the canvas where `layer` is covered, within `bounds`.
    fn invert(&mut self, layer: &Pixmap, bounds: Bounds) {
        let width = i64::from(self.width());
        let height = i64::from(self.height());
        let clip = |start: i64, len: usize, max: i64| {
            let end = start.saturating_add(i64::try_from(len).unwrap_or(i64::MAX));
            // both clamped to 0..=max, which fits in usize
            (start.clamp(0, max) as usize, end.clamp(0, max) as usize)
        };
        let (x0, x1) = clip(bounds.left, bounds.width, width);
        let (y0, y1) = clip(bounds.top, bounds.height, height);

        let stride = width as usize;
        let covered = layer.pixels();
        let pixels = self.pixmap.pixels_mut();
        for y in y0..y1 {
            for x in x0..x1 {
                let index = y * stride + x;
                if covered[index].alpha() < REVERSE_THRESHOLD {
                    continue;
                }
                let value = u8::MAX - pixels[index].red();
                if let Some(flipped) = PremultipliedColorU8::from_rgba(value, value, value, u8::MAX) {
                    pixels[index] = flipped;
                }
            }
        }
    }

    /// Finishes drawing; the canvas is opaque gray, so red is the gray level.
    pub fn into_image(self) -> GrayImage {
        let width = self.width();
        let pixels = self.pixmap.pixels();
        GrayImage::from_fn(width, self.height(), |x, y| {
            Luma([pixels[(y * width + x) as usize].red()])
        })
    }
}
