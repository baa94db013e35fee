//! Label rendering.

use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder, imageops};
use tiny_skia::{FillRule, Paint, Path as Outline, Pixmap, PixmapPaint, Transform};
use zpl_interpreter::{Anchor, FieldPosition, Label, LabelElement};
use zpl_parser::{Color, Justification, Orientation};

use crate::barcode::{SymbolLayout, layout_symbol};
use crate::canvas::{Bounds, Canvas, Ink, orientation_transform};
use crate::error::{RenderError, Result};
use crate::shapes::{bitmap_pixmap, box_path, diagonal_path, diagonal_width, ellipse_path};
use crate::text::{FontRegistry, TextLayout, layout_block, layout_line};

/// Largest canvas side in dots, a metre at 24 dpmm.
const MAX_DIMENSION: u64 = 24_000;

/// Largest canvas area in dots.
const MAX_AREA: u64 = 64_000_000;

/// Directory searched for fonts by [`render`].
pub const DEFAULT_FONT_DIR: &str = "fonts";

/// Canvas settings for labels that do not set their own size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Label width in millimetres when `^PW` is missing
    pub width_mm: u32,
    /// Label height in millimetres when `^LL` is missing
    pub height_mm: u32,
    /// Print density in dots per millimetre
    pub dpmm: u32,
    /// Gray level below which pixels become black; keeps anti-aliasing when
    /// `None`
    pub threshold: Option<u8>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width_mm: 100,
            height_mm: 150,
            dpmm: 8,
            threshold: None,
        }
    }
}

/// An encoded label image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// PNG file contents, 8-bit grayscale
    pub png: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// What an element draws, in its own coordinates.
enum Graphic<'a> {
    Outline(Outline),
    Image(Pixmap),
    Text(TextLayout<'a>),
    Symbol(SymbolLayout<'a>),
}

/// An element laid out in its own coordinates, unrotated.
struct Drawing<'a> {
    graphic: Graphic<'a>,
    width: usize,
    height: usize,
    /// Column the field position refers to
    origin_x: usize,
    /// Row `^FT` positions refer to: text baseline, bar bottom or element bottom
    baseline: usize,
    orientation: Orientation,
    ink: Ink,
}

impl<'a> Drawing<'a> {
    fn shape(graphic: Graphic<'a>, width: usize, height: usize, ink: Ink) -> Self {
        Self {
            graphic,
            width,
            height,
            origin_x: 0,
            baseline: height,
            orientation: Orientation::Normal,
            ink,
        }
    }

    /// Transform from element to canvas coordinates and the canvas area the
    /// rotated element covers.
    fn place(&self, position: FieldPosition) -> (Transform, Bounds) {
        let (x, y) = (i64::from(position.x), i64::from(position.y));
        let (width, height) = match self.orientation {
            Orientation::Normal | Orientation::Inverted => (self.width, self.height),
            Orientation::Rotated | Orientation::BottomUp => (self.height, self.width),
        };

        let (mut left, top) = match (self.orientation, position.anchor) {
            (Orientation::Normal, Anchor::Origin) => (x - self.origin_x as i64, y),
            (Orientation::Normal, Anchor::Typeset) => {
                (x - self.origin_x as i64, y - self.baseline as i64)
            }
            (_, Anchor::Origin) => (x, y),
            (_, Anchor::Typeset) => (x, y - height as i64),
        };
        if position.justification == Justification::Right {
            left = x - width as i64;
        }

        let transform = orientation_transform(
            self.orientation,
            self.width as f32,
            self.height as f32,
        )
        .post_translate(left as f32, top as f32);
        let bounds = Bounds {
            left,
            top,
            width,
            height,
        };
        (transform, bounds)
    }

    fn draw(&self, pixmap: &mut Pixmap, paint: &Paint<'_>, transform: Transform) {
        match &self.graphic {
            Graphic::Outline(path) => {
                pixmap.fill_path(path, paint, FillRule::EvenOdd, transform, None);
            }
            Graphic::Image(image) => {
                pixmap.draw_pixmap(0, 0, image.as_ref(), &PixmapPaint::default(), transform, None);
            }
            Graphic::Text(text) => text.draw(pixmap, transform),
            Graphic::Symbol(symbol) => symbol.draw(pixmap, paint, transform),
        }
    }
}

/// Draws labels with a set of fonts.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    fonts: FontRegistry,
    options: RenderOptions,
}

impl Renderer {
    /// Creates a renderer.
    pub fn new(fonts: FontRegistry, options: RenderOptions) -> Self {
        Self { fonts, options }
    }

    /// Fonts used for text.
    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Canvas settings.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Canvas size of a label in dots.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidDimensions`] for an empty or oversized
    /// canvas.
    pub fn canvas_size(&self, label: &Label) -> Result<(u32, u32)> {
        let width = match label.width {
            0 => u64::from(self.options.width_mm) * u64::from(self.options.dpmm),
            width => width as u64,
        };
        let height = match label.height {
            0 => u64::from(self.options.height_mm) * u64::from(self.options.dpmm),
            height => height as u64,
        };
        if width == 0
            || height == 0
            || width > MAX_DIMENSION
            || height > MAX_DIMENSION
            || width * height > MAX_AREA
        {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        // both sides are at most MAX_DIMENSION
        Ok((width as u32, height as u32))
    }

    /// Draws a label.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidDimensions`] when the canvas size is
    /// unusable.
    pub fn render_image(&self, label: &Label) -> Result<GrayImage> {
        let (width, height) = self.canvas_size(label)?;
        let mut canvas =
            Canvas::new(width, height).ok_or(RenderError::InvalidDimensions {
                width: u64::from(width),
                height: u64::from(height),
            })?;

        for element in &label.elements {
            let Some(drawing) = self.layout(element) else {
                continue;
            };
            let (transform, bounds) = drawing.place(element.position());
            canvas.paint(drawing.ink, bounds, |pixmap, paint| {
                drawing.draw(pixmap, paint, transform);
            });
        }

        let mut image = canvas.into_image();
        if label.inverted {
            image = imageops::rotate180(&image);
        }
        if let Some(threshold) = self.options.threshold {
            for pixel in image.pixels_mut() {
                pixel.0[0] = if pixel.0[0] < threshold { 0 } else { u8::MAX };
            }
        }
        tracing::debug!(width, height, elements = label.elements.len(), "rendered label");
        Ok(image)
    }

    /// Draws a label and encodes it as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidDimensions`] for an unusable canvas and
    /// [`RenderError::Encode`] when PNG encoding fails.
    pub fn render(&self, label: &Label) -> Result<RenderOutput> {
        let image = self.render_image(label)?;
        let (width, height) = image.dimensions();
        let png = encode_png(&image)?;
        Ok(RenderOutput { png, width, height })
    }

    fn layout<'a>(&'a self, element: &LabelElement) -> Option<Drawing<'a>> {
        let ink = |color| Ink::for_field(color, element.reverse());
        let drawing = match element {
            LabelElement::Box {
                width,
                height,
                thickness,
                color,
                rounding,
                ..
            } => Drawing::shape(
                Graphic::Outline(box_path(*width, *height, *thickness, *rounding)?),
                *width,
                *height,
                ink(*color),
            ),
            LabelElement::Ellipse {
                width,
                height,
                thickness,
                color,
                ..
            } => Drawing::shape(
                Graphic::Outline(ellipse_path(*width, *height, *thickness)?),
                *width,
                *height,
                ink(*color),
            ),
            LabelElement::Diagonal {
                width,
                height,
                thickness,
                color,
                direction,
                ..
            } => Drawing::shape(
                Graphic::Outline(diagonal_path(*width, *height, *thickness, *direction)?),
                diagonal_width(*width, *thickness),
                *height,
                ink(*color),
            ),
            LabelElement::Image { bitmap, .. } => Drawing::shape(
                Graphic::Image(bitmap_pixmap(bitmap)?),
                bitmap.width,
                bitmap.height,
                ink(Color::Black),
            ),
            LabelElement::Barcode {
                orientation,
                symbol,
                ..
            } => {
                let layout = layout_symbol(symbol, &self.fonts);
                Drawing {
                    width: layout.width,
                    height: layout.height,
                    origin_x: layout.bars_left,
                    baseline: layout.bars_bottom,
                    orientation: *orientation,
                    ink: ink(Color::Black),
                    graphic: Graphic::Symbol(layout),
                }
            }
            LabelElement::Text {
                font: spec,
                orientation,
                content,
                block,
                ..
            } => {
                let Some(font) = self.fonts.select(spec.name) else {
                    tracing::warn!(font = %spec.name, text = %content, "no font loaded, skipping text");
                    return None;
                };
                let layout = match block {
                    Some(block) => layout_block(font, *spec, content, block),
                    None => layout_line(font, *spec, content),
                };
                Drawing {
                    width: layout.width,
                    height: layout.height,
                    origin_x: 0,
                    baseline: layout.baseline,
                    orientation: *orientation,
                    ink: ink(Color::Black),
                    graphic: Graphic::Text(layout),
                }
            }
            _ => return None,
        };
        Some(drawing)
    }
}

fn encode_png(image: &GrayImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::L8,
    )?;
    Ok(png)
}

/// Renders a label with default options and the fonts found in
/// [`DEFAULT_FONT_DIR`].
///
/// # Errors
///
/// See [`Renderer::render`].
pub fn render(label: &Label) -> Result<RenderOutput> {
    let fonts = FontRegistry::from_dir(Path::new(DEFAULT_FONT_DIR));
    Renderer::new(fonts, RenderOptions::default()).render(label)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zpl_interpreter::interpret;
    use zpl_parser::parse_zpl;

    use super::*;
    use crate::text::FontRole;
    use crate::text::testing::BlockFont;

    fn label(zpl: &str) -> Label {
        interpret(&parse_zpl(zpl).unwrap())
    }

    fn black(image: &GrayImage, x: u32, y: u32) -> bool {
        image.get_pixel(x, y).0[0] < 128
    }

    fn renderer() -> Renderer {
        let fonts = FontRegistry::new().with_font(FontRole::Mono, BlockFont);
        Renderer::new(fonts, RenderOptions::default())
    }

    #[test]
    fn test_default_canvas_size() {
        let image = renderer().render_image(&Label::default()).unwrap();
        assert_eq!(image.dimensions(), (800, 1200));
        assert!(image.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_label_size_overrides_defaults() {
        let image = renderer()
            .render_image(&label("^XA^PW200^LL100^XZ"))
            .unwrap();
        assert_eq!(image.dimensions(), (200, 100));
    }

    #[test]
    fn test_invalid_dimensions() {
        let options = RenderOptions {
            width_mm: 0,
            ..RenderOptions::default()
        };
        let err = Renderer::new(FontRegistry::new(), options)
            .render_image(&Label::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidDimensions { width: 0, .. }));

        let huge = Label {
            width: 1_000_000,
            ..Label::default()
        };
        assert!(renderer().render_image(&huge).is_err());
    }

    #[test]
    fn test_filled_box() {
        let image = renderer()
            .render_image(&label("^XA^PW100^LL100^FO10,20^GB30,40,30^FS^XZ"))
            .unwrap();
        assert!(black(&image, 10, 20));
        assert!(black(&image, 39, 59));
        assert!(!black(&image, 9, 20));
        assert!(!black(&image, 40, 20));
        assert!(!black(&image, 10, 60));
    }

    #[test]
    fn test_typeset_box_bottom_on_y() {
        let image = renderer()
            .render_image(&label("^XA^PW100^LL100^FT10,50^GB20,20,20^FS^XZ"))
            .unwrap();
        assert!(black(&image, 10, 30));
        assert!(black(&image, 10, 49));
        assert!(!black(&image, 10, 50));
        assert!(!black(&image, 10, 29));
    }

    #[test]
    fn test_right_justified_box() {
        let image = renderer()
            .render_image(&label("^XA^PW100^LL100^FO50,10,1^GB20,20,20^FS^XZ"))
            .unwrap();
        assert!(black(&image, 30, 10));
        assert!(black(&image, 49, 10));
        assert!(!black(&image, 50, 10));
    }

    #[test]
    fn test_reverse_box_inverts_background() {
        let image = renderer()
            .render_image(&label(
                "^XA^PW100^LL100^FO0,0^GB50,50,50^FS^FO25,0^FR^GB50,50,50^FS^XZ",
            ))
            .unwrap();
        assert!(black(&image, 10, 10));
        assert!(!black(&image, 30, 10));
        assert!(black(&image, 60, 10));
    }

    #[test]
    fn test_reverse_text() {
        let image = renderer()
            .render_image(&label(
                "^XA^PW100^LL100^FO0,0^GB100,100,100^FS^FO10,10^FR^A0N,10,10^FDA^FS^XZ",
            ))
            .unwrap();
        assert!(!black(&image, 10, 17));
        assert!(black(&image, 10, 10));
        assert!(black(&image, 50, 50));
    }

    #[test]
    fn test_graphic_field() {
        let image = renderer()
            .render_image(&label("^XA^PW20^LL20^FO4,6^GFA,2,2,1,80FF^FS^XZ"))
            .unwrap();
        assert!(black(&image, 4, 6));
        assert!(!black(&image, 5, 6));
        assert!((4..12).all(|x| black(&image, x, 7)));
        assert!(!black(&image, 12, 7));
    }

    #[test]
    fn test_white_box() {
        let image = renderer()
            .render_image(&label(
                "^XA^PW100^LL100^FO0,0^GB50,50,50^FS^FO10,10^GB10,10,10,W^FS^XZ",
            ))
            .unwrap();
        assert!(!black(&image, 15, 15));
        assert!(black(&image, 30, 30));
    }

    #[test]
    fn test_text_is_drawn() {
        let image = renderer()
            .render_image(&label("^XA^PW100^LL100^FO10,10^A0N,10,10^FDAB^FS^XZ"))
            .unwrap();
        // block glyphs: 5x7 on an 8 dot ascent
        assert!(black(&image, 10, 17));
        assert!(!black(&image, 10, 10));
        assert!(black(&image, 16, 17));
    }

    #[test]
    fn test_typeset_text_sits_on_baseline() {
        let image = renderer()
            .render_image(&label("^XA^PW100^LL100^FT10,50^A0N,10,10^FDA^FS^XZ"))
            .unwrap();
        assert!(black(&image, 10, 49));
        assert!(black(&image, 10, 43));
        assert!(!black(&image, 10, 50));
        assert!(!black(&image, 10, 42));
    }

    #[test]
    fn test_rotated_text() {
        let image = renderer()
            .render_image(&label("^XA^PW100^LL100^FO10,10^A0R,10,10^FDAB^FS^XZ"))
            .unwrap();
        // the line runs downwards, glyph tops facing right
        assert!(black(&image, 12, 10));
        assert!(!black(&image, 10, 10));
        assert!(!black(&image, 12, 15));
        assert!(black(&image, 12, 16));
    }

    #[test]
    fn test_text_without_fonts_is_skipped() {
        let image = Renderer::default()
            .render_image(&label("^XA^PW50^LL50^FO0,0^FDHello^FS^XZ"))
            .unwrap();
        assert!(image.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_barcode_bars() {
        let image = renderer()
            .render_image(&label("^XA^PW400^LL200^BY2^FO10,10^BCN,50,N^FD123^FS^XZ"))
            .unwrap();
        // Code 128 starts with a two module bar
        assert!(black(&image, 10, 10));
        assert!(black(&image, 13, 59));
        assert!(!black(&image, 10, 60));
        assert!(!black(&image, 9, 10));
    }

    #[test]
    fn test_oversized_elements_are_clipped() {
        let image = renderer()
            .render_image(&label(
                "^XA^PW100^LL100^FO0,0^GB400000,400000,1^FS\
                 ^FO0,0^A0N,900000,900000^FDW^FS\
                 ^BY10^FO0,0^BCN,400000,Y^FD12^FS^XZ",
            ))
            .unwrap();
        assert_eq!(image.dimensions(), (100, 100));
        // the Code 128 start bar covers the left edge
        assert!(black(&image, 0, 99));
    }

    #[test]
    fn test_oversized_reverse_field() {
        let image = renderer()
            .render_image(&label(
                "^XA^PW100^LL100^FO-10000,-10000^FR^GB400000,400000,400000^FS^XZ",
            ))
            .unwrap();
        assert!(image.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_canvas_area_limit() {
        let wide = Label {
            width: 20_000,
            height: 20_000,
            ..Label::default()
        };
        assert!(matches!(
            renderer().canvas_size(&wide),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_inverted_label() {
        let image = renderer()
            .render_image(&label("^XA^PW100^LL100^POI^FO0,0^GB10,10,10^FS^XZ"))
            .unwrap();
        assert!(!black(&image, 0, 0));
        assert!(black(&image, 99, 99));
        assert!(black(&image, 90, 90));
    }

    #[test]
    fn test_threshold_binarizes() {
        let options = RenderOptions {
            threshold: Some(128),
            ..RenderOptions::default()
        };
        let image = Renderer::new(FontRegistry::new(), options)
            .render_image(&label("^XA^PW60^LL60^FO0,0^GC50,3^FS^XZ"))
            .unwrap();
        assert!(image.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn test_render_png() {
        let output = renderer()
            .render(&label("^XA^PW40^LL30^FO0,0^GB40,30,2^FS^XZ"))
            .unwrap();
        assert_eq!((output.width, output.height), (40, 30));
        assert!(output.png.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    proptest::proptest! {
        #[test]
        fn elements_stay_on_canvas(
            x in 0usize..200,
            y in 0usize..200,
            w in 1usize..120,
            h in 1usize..120,
            t in 1usize..40,
        ) {
            let zpl = format!("^XA^PW64^LL48^FO{x},{y}^GB{w},{h},{t}^FS^FO{x},{y}^GE{w},{h},{t}^FS^XZ");
            let image = renderer().render_image(&label(&zpl)).unwrap();
            proptest::prop_assert_eq!(image.dimensions(), (64, 48));
        }
    }
}
