//! Box, ellipse and diagonal outlines as paths, bitmaps as pixmaps.
//!
//! Everything is built in element coordinates with the top-left corner at
//! the origin. Outlines are filled with the even-odd rule, so the inner
//! contour cuts the hole.

use tiny_skia::{Color, IntSize, Mask, Path, PathBuilder, Pixmap, Rect};
use zpl_interpreter::Bitmap;
use zpl_parser::DiagonalDirection;

/// Highest `^GB` rounding degree.
const MAX_ROUNDING: f32 = 8.0;

/// Control point distance of a cubic quarter circle, per unit radius.
const KAPPA: f32 = 0.552_284_8;

fn push_rounded_rect(builder: &mut PathBuilder, rect: Rect, radius: f32) {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
    if r <= 0.0 {
        builder.push_rect(rect);
        return;
    }
    let (l, t, rt, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let k = r * (1.0 - KAPPA);
    builder.move_to(l + r, t);
    builder.line_to(rt - r, t);
    builder.cubic_to(rt - k, t, rt, t + k, rt, t + r);
    builder.line_to(rt, b - r);
    builder.cubic_to(rt, b - k, rt - k, b, rt - r, b);
    builder.line_to(l + r, b);
    builder.cubic_to(l + k, b, l, b - k, l, b - r);
    builder.line_to(l, t + r);
    builder.cubic_to(l, t + k, l + k, t, l + r, t);
    builder.close();
}

/// The hole of an outline `thickness` wide, if any is left.
fn inset(width: f32, height: f32, thickness: f32) -> Option<Rect> {
    let (w, h) = (width - 2.0 * thickness, height - 2.0 * thickness);
    if w > 0.0 && h > 0.0 {
        Rect::from_xywh(thickness, thickness, w, h)
    } else {
        None
    }
}

/// `^GB` outline; a thickness reaching the center fills the box.
pub fn box_path(width: usize, height: usize, thickness: usize, rounding: u8) -> Option<Path> {
    let (w, h, t) = (width as f32, height as f32, thickness as f32);
    let radius = f32::from(rounding) / MAX_ROUNDING * w.min(h) / 2.0;

    let mut builder = PathBuilder::new();
    push_rounded_rect(&mut builder, Rect::from_xywh(0.0, 0.0, w, h)?, radius);
    if let Some(hole) = inset(w, h, t) {
        push_rounded_rect(&mut builder, hole, (radius - t).max(0.0));
    }
    builder.finish()
}

/// `^GE` / `^GC` outline.
pub fn ellipse_path(width: usize, height: usize, thickness: usize) -> Option<Path> {
    let (w, h, t) = (width as f32, height as f32, thickness as f32);

    let mut builder = PathBuilder::new();
    builder.push_oval(Rect::from_xywh(0.0, 0.0, w, h)?);
    if let Some(hole) = inset(w, h, t) {
        builder.push_oval(hole);
    }
    builder.finish()
}

/// Width of a `^GD` element; the line is never narrower than its thickness.
pub fn diagonal_width(width: usize, thickness: usize) -> usize {
    width.max(thickness)
}

/// `^GD` line of horizontal thickness across a `width` × `height` box.
pub fn diagonal_path(
    width: usize,
    height: usize,
    thickness: usize,
    direction: DiagonalDirection,
) -> Option<Path> {
    let w = diagonal_width(width, thickness) as f32;
    let (h, t) = (height as f32, thickness as f32);

    let mut builder = PathBuilder::new();
    match direction {
        DiagonalDirection::Right => {
            builder.move_to(w - t, 0.0);
            builder.line_to(w, 0.0);
            builder.line_to(t, h);
            builder.line_to(0.0, h);
        }
        DiagonalDirection::Left => {
            builder.move_to(0.0, 0.0);
            builder.line_to(t, 0.0);
            builder.line_to(w, h);
            builder.line_to(w - t, h);
        }
    }
    builder.close();
    builder.finish()
}

/// `^GF` bitmap: black where the bitmap is black, transparent elsewhere.
pub fn bitmap_pixmap(bitmap: &Bitmap) -> Option<Pixmap> {
    let width = u32::try_from(bitmap.width).ok()?;
    let height = u32::try_from(bitmap.height).ok()?;
    let mut pixmap = Pixmap::new(width, height)?;
    pixmap.fill(Color::BLACK);

    let alpha = bitmap
        .pixels
        .iter()
        .map(|pixel| if *pixel == 1 { u8::MAX } else { 0 })
        .collect();
    let mask = Mask::from_vec(alpha, IntSize::from_wh(width, height)?)?;
    pixmap.apply_mask(&mask);
    Some(pixmap)
}
