//! Fonts and text layout.
//!
//! ZPL fonts are addressed by a single character. Scalable font `0` maps to
//! a proportional sans face, `E` and `H` (the OCR-B fonts of Zebra printers)
//! to OCR-B, and every other name to a monospace face. Character height sets
//! the pixel size, the ratio of width to height stretches glyphs
//! horizontally.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use tiny_skia::{IntSize, Pixmap, PixmapPaint, Transform};
use zpl_interpreter::{FontSpec, TextBlock};
use zpl_parser::TextBlockJustification;

use crate::error::{RenderError, Result};

/// Line break marker inside `^FB` field data.
const LINE_BREAK: &str = "\\&";

/// A rasterised glyph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlyphBitmap {
    /// Bitmap width in pixels
    pub width: usize,
    /// Bitmap height in pixels
    pub height: usize,
    /// Offset of the bitmap from the pen position
    pub xmin: i32,
    /// Offset of the bitmap bottom from the baseline, up is positive
    pub ymin: i32,
    /// Pen advance in pixels
    pub advance: f32,
    /// `width * height` coverage values
    pub coverage: Vec<u8>,
}

/// Ascent and descent of a face at a pixel size; descent is negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalMetrics {
    /// Distance from the baseline to the top of the line
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line, negative
    pub descent: f32,
}

/// Something that can rasterise glyphs.
pub trait GlyphSource: Send + Sync {
    /// Rasterises `ch` at `px` pixels per em.
    fn glyph(&self, ch: char, px: f32) -> GlyphBitmap;

    /// Pen advance of `ch` without rasterising it.
    fn advance(&self, ch: char, px: f32) -> f32;

    /// Line metrics at `px` pixels per em.
    fn vertical_metrics(&self, px: f32) -> VerticalMetrics;
}

impl GlyphSource for Font {
    fn glyph(&self, ch: char, px: f32) -> GlyphBitmap {
        let (metrics, coverage) = self.rasterize(ch, px);
        GlyphBitmap {
            width: metrics.width,
            height: metrics.height,
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            advance: metrics.advance_width,
            coverage,
        }
    }

    fn advance(&self, ch: char, px: f32) -> f32 {
        self.metrics(ch, px).advance_width
    }

    fn vertical_metrics(&self, px: f32) -> VerticalMetrics {
        self.horizontal_line_metrics(px).map_or(
            VerticalMetrics {
                ascent: px * 0.8,
                descent: -px * 0.2,
            },
            |m| VerticalMetrics {
                ascent: m.ascent,
                descent: m.descent,
            },
        )
    }
}

/// The face families a label can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Proportional sans serif, scalable font `0`
    Sans,
    /// Monospace, bitmap fonts `A` to `Z` and `1` to `9`
    Mono,
    /// OCR-B, fonts `E` and `H`, EAN interpretation lines
    Ocr,
}

impl FontRole {
    /// All roles in fallback order.
    pub const ALL: [FontRole; 3] = [FontRole::Sans, FontRole::Mono, FontRole::Ocr];

    /// Role used for a ZPL font name.
    pub fn for_font_name(name: char) -> Self {
        match name.to_ascii_uppercase() {
            '0' => FontRole::Sans,
            'E' | 'H' => FontRole::Ocr,
            _ => FontRole::Mono,
        }
    }

    /// File of the role below a font directory.
    pub fn default_file(self) -> &'static str {
        match self {
            FontRole::Sans => "AdwaitaSans/AdwaitaSans-Regular.ttf",
            FontRole::Mono => "AdwaitaMono/AdwaitaMono-Regular.ttf",
            FontRole::Ocr => "OCRB/OCRB.ttf",
        }
    }
}

/// Fonts available to the renderer.
#[derive(Clone, Default)]
pub struct FontRegistry {
    sans: Option<Arc<dyn GlyphSource>>,
    mono: Option<Arc<dyn GlyphSource>>,
    ocr: Option<Arc<dyn GlyphSource>>,
}

impl fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontRegistry")
            .field("sans", &self.sans.is_some())
            .field("mono", &self.mono.is_some())
            .field("ocr", &self.ocr.is_some())
            .finish()
    }
}

impl FontRegistry {
    /// A registry without fonts; text is skipped when rendering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the standard font files below `dir`. Missing or broken files
    /// are logged and left out.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut registry = Self::new();
        for role in FontRole::ALL {
            let path = dir.join(role.default_file());
            if let Err(err) = registry.load_file(role, &path) {
                tracing::warn!(role = ?role, error = %err, "font not loaded");
            }
        }
        registry
    }

    /// Registers a font for a role, replacing any earlier one.
    pub fn insert(&mut self, role: FontRole, font: Arc<dyn GlyphSource>) {
        *self.slot(role) = Some(font);
    }

    /// Builder form of [`FontRegistry::insert`].
    pub fn with_font(mut self, role: FontRole, font: impl GlyphSource + 'static) -> Self {
        self.insert(role, Arc::new(font));
        self
    }

    /// Reads and registers a TrueType/OpenType font file.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Font`] when the file cannot be read or parsed.
    pub fn load_file(&mut self, role: FontRole, path: &Path) -> Result<()> {
        let font = load_font(path)?;
        tracing::debug!(role = ?role, path = %path.display(), "loaded font");
        self.insert(role, Arc::new(font));
        Ok(())
    }

    /// The font registered for `role`.
    pub fn get(&self, role: FontRole) -> Option<&dyn GlyphSource> {
        match role {
            FontRole::Sans => self.sans.as_deref(),
            FontRole::Mono => self.mono.as_deref(),
            FontRole::Ocr => self.ocr.as_deref(),
        }
    }

    /// The font for `role`, or the first registered font otherwise.
    pub fn resolve(&self, role: FontRole) -> Option<&dyn GlyphSource> {
        self.get(role)
            .or_else(|| FontRole::ALL.iter().find_map(|role| self.get(*role)))
    }

    /// The font for a ZPL font name.
    pub fn select(&self, name: char) -> Option<&dyn GlyphSource> {
        self.resolve(FontRole::for_font_name(name))
    }

    /// Whether no font is registered.
    pub fn is_empty(&self) -> bool {
        FontRole::ALL.iter().all(|role| self.get(*role).is_none())
    }

    fn slot(&mut self, role: FontRole) -> &mut Option<Arc<dyn GlyphSource>> {
        match role {
            FontRole::Sans => &mut self.sans,
            FontRole::Mono => &mut self.mono,
            FontRole::Ocr => &mut self.ocr,
        }
    }
}

fn load_font(path: &Path) -> Result<Font> {
    let data = std::fs::read(path)
        .map_err(|e| RenderError::font(format!("{}: {e}", path.display())))?;
    Font::from_bytes(data, FontSettings::default())
        .map_err(|e| RenderError::font(format!("{}: {e}", path.display())))
}

/// Largest pixel size glyphs are rasterised at; bigger text is scaled up.
const MAX_RASTER_PX: f32 = 512.0;

/// A font at a ZPL character size.
struct Style<'a> {
    font: &'a dyn GlyphSource,
    raster_px: f32,
    upscale: f32,
    scale_x: f32,
    ascent: f32,
    line_height: usize,
}

impl<'a> Style<'a> {
    fn new(font: &'a dyn GlyphSource, spec: FontSpec) -> Self {
        let px = spec.height.max(1) as f32;
        let scale_x = if spec.width == 0 {
            1.0
        } else {
            spec.width as f32 / px
        };
        let raster_px = px.min(MAX_RASTER_PX);
        let metrics = font.vertical_metrics(px);
        let ascent = metrics.ascent.ceil().max(0.0);
        let line_height = (ascent - metrics.descent.floor()).max(1.0) as usize;
        Self {
            font,
            raster_px,
            upscale: px / raster_px,
            scale_x,
            ascent,
            line_height,
        }
    }

    fn advance(&self, c: char) -> f32 {
        self.font.advance(c, self.raster_px) * self.upscale * self.scale_x
    }

    fn measure(&self, text: &str) -> f32 {
        text.chars().map(|c| self.advance(c)).sum()
    }

    /// Draws `text` with its pen starting at `x` and the line top at `top`.
    fn draw(&self, pixmap: &mut Pixmap, text: &str, x: f32, top: f32, transform: Transform) {
        let baseline = top + self.ascent;
        let paint = PixmapPaint::default();
        let mut pen = x;
        for c in text.chars() {
            let glyph = self.font.glyph(c, self.raster_px);
            if let Some(bitmap) = glyph_pixmap(&glyph) {
                let left = (pen + glyph.xmin as f32 * self.upscale * self.scale_x).round();
                let glyph_top =
                    (baseline - (glyph.ymin as f32 + glyph.height as f32) * self.upscale).round();
                let placement = transform
                    .pre_translate(left, glyph_top)
                    .pre_scale(self.upscale * self.scale_x, self.upscale);
                pixmap.draw_pixmap(0, 0, bitmap.as_ref(), &paint, placement, None);
            }
            pen += glyph.advance * self.upscale * self.scale_x;
        }
    }
}

/// A black glyph with its coverage as alpha.
fn glyph_pixmap(glyph: &GlyphBitmap) -> Option<Pixmap> {
    let size = IntSize::from_wh(
        u32::try_from(glyph.width).ok()?,
        u32::try_from(glyph.height).ok()?,
    )?;
    let rgba = glyph
        .coverage
        .iter()
        .flat_map(|alpha| [0, 0, 0, *alpha])
        .collect();
    Pixmap::from_vec(rgba, size)
}

/// A piece of text at its position inside the layout.
#[derive(Debug, Clone, PartialEq)]
struct Run {
    text: String,
    x: f32,
    top: f32,
}

/// Laid out text, ready to be drawn at any transform.
pub(crate) struct TextLayout<'a> {
    style: Style<'a>,
    runs: Vec<Run>,
    /// Width in dots
    pub width: usize,
    /// Height in dots
    pub height: usize,
    /// Baseline of the last line
    pub baseline: usize,
}

impl TextLayout<'_> {
    /// Draws the text with `transform` mapping layout coordinates to the
    /// pixmap.
    pub(crate) fn draw(&self, pixmap: &mut Pixmap, transform: Transform) {
        for run in &self.runs {
            self.style.draw(pixmap, &run.text, run.x, run.top, transform);
        }
    }
}

/// Lays out a single line of text.
pub(crate) fn layout_line<'a>(font: &'a dyn GlyphSource, spec: FontSpec, text: &str) -> TextLayout<'a> {
    let style = Style::new(font, spec);
    let width = style.measure(text).ceil().max(1.0) as usize;
    TextLayout {
        runs: vec![Run {
            text: text.to_string(),
            x: 0.0,
            top: 0.0,
        }],
        width,
        height: style.line_height,
        baseline: style.ascent as usize,
        style,
    }
}

#[derive(Debug, Default)]
struct Line {
    words: Vec<String>,
    indent: f32,
    ends_paragraph: bool,
}

fn wrap(style: &Style<'_>, text: &str, block: &TextBlock) -> Vec<Line> {
    let space = style.measure(" ");
    let mut lines: Vec<Line> = Vec::new();

    for paragraph in text.split(LINE_BREAK) {
        let mut line = Line {
            indent: if lines.is_empty() {
                0.0
            } else {
                block.hanging_indent as f32
            },
            ..Line::default()
        };
        let mut used = 0.0;

        for word in paragraph.split_whitespace() {
            let width = style.measure(word);
            let limit = if block.width == 0 {
                f32::INFINITY
            } else {
                block.width as f32 - line.indent
            };
            if !line.words.is_empty() && used + space + width > limit {
                lines.push(std::mem::replace(
                    &mut line,
                    Line {
                        indent: block.hanging_indent as f32,
                        ..Line::default()
                    },
                ));
                used = 0.0;
            }
            if !line.words.is_empty() {
                used += space;
            }
            used += width;
            line.words.push(word.to_string());
        }

        line.ends_paragraph = true;
        lines.push(line);
    }

    let limit = block.lines.max(1);
    if lines.len() > limit {
        let overflow: Vec<String> = lines
            .drain(limit..)
            .flat_map(|line| line.words)
            .collect();
        if let Some(last) = lines.last_mut() {
            last.words.extend(overflow);
            last.ends_paragraph = true;
        }
    }

    lines
}

/// Lays out `^FB` text: word wrapped, justified and limited to the block's
/// line count. Lines past the limit are printed over the last line.
pub(crate) fn layout_block<'a>(
    font: &'a dyn GlyphSource,
    spec: FontSpec,
    text: &str,
    block: &TextBlock,
) -> TextLayout<'a> {
    let style = Style::new(font, spec);
    let lines = wrap(&style, text, block);
    let space = style.measure(" ");

    let step = (style.line_height as isize)
        .saturating_add(block.line_spacing)
        .max(1) as usize;
    let count = lines.len().max(1);
    let height = step.saturating_mul(count - 1).saturating_add(style.line_height);
    let width = if block.width == 0 {
        lines
            .iter()
            .map(|line| {
                let words: f32 = line.words.iter().map(|w| style.measure(w)).sum();
                line.indent + words + space * line.words.len().saturating_sub(1) as f32
            })
            .fold(1.0_f32, f32::max)
            .ceil() as usize
    } else {
        block.width
    };

    let mut runs = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let widths: Vec<f32> = line.words.iter().map(|w| style.measure(w)).collect();
        let words: f32 = widths.iter().sum();
        let gaps = line.words.len().saturating_sub(1) as f32;
        let natural = words + space * gaps;
        let available = width as f32 - line.indent;

        let (mut x, gap) = match block.justification {
            TextBlockJustification::Left => (line.indent, space),
            TextBlockJustification::Right => (line.indent + available - natural, space),
            TextBlockJustification::Center => (line.indent + (available - natural) / 2.0, space),
            TextBlockJustification::Justified if !line.ends_paragraph && gaps > 0.0 => {
                (line.indent, (available - words) / gaps)
            }
            TextBlockJustification::Justified => (line.indent, space),
        };

        let top = (index * step) as f32;
        for (word, word_width) in line.words.iter().zip(&widths) {
            runs.push(Run {
                text: word.clone(),
                x,
                top,
            });
            x += word_width + gap;
        }
    }

    TextLayout {
        runs,
        width,
        height,
        baseline: (count - 1).saturating_mul(step).saturating_add(style.ascent as usize),
        style,
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::testing::BlockFont;
    use super::*;

    fn spec(height: usize, width: usize) -> FontSpec {
        FontSpec {
            name: '0',
            height,
            width,
        }
    }

    fn block(width: usize, lines: usize, justification: TextBlockJustification) -> TextBlock {
        TextBlock {
            width,
            lines,
            line_spacing: 0,
            justification,
            hanging_indent: 0,
        }
    }

    /// Draws a layout on a transparent pixmap of its own size.
    fn rasterise(layout: &TextLayout<'_>) -> Pixmap {
        let mut pixmap = Pixmap::new(layout.width as u32, layout.height as u32).unwrap();
        layout.draw(&mut pixmap, Transform::identity());
        pixmap
    }

    fn alpha(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).unwrap().alpha()
    }

    fn covered_columns(pixmap: &Pixmap, row: u32) -> Vec<u32> {
        (0..pixmap.width()).filter(|x| alpha(pixmap, *x, row) > 0).collect()
    }

    #[test]
    fn test_font_roles() {
        assert_eq!(FontRole::for_font_name('0'), FontRole::Sans);
        assert_eq!(FontRole::for_font_name('E'), FontRole::Ocr);
        assert_eq!(FontRole::for_font_name('h'), FontRole::Ocr);
        assert_eq!(FontRole::for_font_name('A'), FontRole::Mono);
        assert_eq!(FontRole::for_font_name('7'), FontRole::Mono);
    }

    #[test]
    fn test_registry_fallback() {
        let registry = FontRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.select('0').is_none());

        let registry = FontRegistry::new().with_font(FontRole::Mono, BlockFont);
        assert!(!registry.is_empty());
        assert!(registry.get(FontRole::Sans).is_none());
        assert!(registry.select('0').is_some());
        assert!(registry.select('E').is_some());
    }

    #[test]
    fn test_from_dir_skips_missing_fonts() {
        let registry = FontRegistry::from_dir("/nonexistent/zpl/fonts");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_file_error() {
        let mut registry = FontRegistry::new();
        let err = registry
            .load_file(FontRole::Sans, Path::new("/nonexistent/font.ttf"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Font { .. }));
    }

    #[test]
    fn test_line_layout_size() {
        let text = layout_line(&BlockFont, spec(10, 10), "ABC");
        // advance 6 per character, ascent 8, descent 2
        assert_eq!(text.width, 18);
        assert_eq!(text.height, 10);
        assert_eq!(text.baseline, 8);
        // glyph block is 5 wide and 7 high, resting on the baseline
        let pixmap = rasterise(&text);
        assert_eq!(alpha(&pixmap, 0, 7), 255);
        assert_eq!(alpha(&pixmap, 0, 0), 0);
        assert_eq!(alpha(&pixmap, 5, 7), 0);
        assert_eq!(alpha(&pixmap, 6, 7), 255);
    }

    #[test]
    fn test_line_width_scale() {
        let narrow = layout_line(&BlockFont, spec(10, 10), "AB");
        let wide = layout_line(&BlockFont, spec(10, 20), "AB");
        assert_eq!(wide.width, narrow.width * 2);
        let pixmap = rasterise(&wide);
        assert_eq!(covered_columns(&pixmap, 7), (0..10).chain(12..22).collect::<Vec<_>>());
    }

    #[test]
    fn test_huge_text_is_scaled_up() {
        let text = layout_line(&BlockFont, spec(2_000, 2_000), "A");
        assert_eq!(text.style.raster_px, MAX_RASTER_PX);
        assert_eq!(text.width, 1_200);
        assert_eq!(text.height, 2_000);
        // a 256 x 358 glyph scaled to 1000 x 1398, resting on the baseline at 1600
        let pixmap = rasterise(&text);
        assert_eq!(alpha(&pixmap, 0, 1_599), 255);
        assert_eq!(alpha(&pixmap, 999, 300), 255);
        assert_eq!(alpha(&pixmap, 0, 150), 0);
        assert_eq!(alpha(&pixmap, 1_000, 1_599), 0);
    }

    #[test]
    fn test_block_wraps_words() {
        // each character advances 6, a space 6
        let text = layout_block(
            &BlockFont,
            spec(10, 10),
            "AA BB CC",
            &block(40, 3, TextBlockJustification::Left),
        );
        assert_eq!(text.width, 40);
        assert_eq!(text.height, 20);
        assert_eq!(text.baseline, 18);
        let pixmap = rasterise(&text);
        assert_eq!(covered_columns(&pixmap, 7).first(), Some(&0));
        assert!(covered_columns(&pixmap, 17).contains(&0));
    }

    #[test]
    fn test_block_line_limit_overprints_last_line() {
        let text = layout_block(
            &BlockFont,
            spec(10, 10),
            "AA BB CC",
            &block(15, 2, TextBlockJustification::Left),
        );
        assert_eq!(text.height, 20);
    }

    #[test]
    fn test_block_explicit_line_break() {
        let text = layout_block(
            &BlockFont,
            spec(10, 10),
            "A\\&B",
            &block(100, 5, TextBlockJustification::Left),
        );
        assert_eq!(text.height, 20);
    }

    #[test]
    fn test_block_right_and_center() {
        let right = layout_block(
            &BlockFont,
            spec(10, 10),
            "A",
            &block(30, 1, TextBlockJustification::Right),
        );
        let columns = covered_columns(&rasterise(&right), 7);
        assert_eq!(columns.first(), Some(&24));

        let center = layout_block(
            &BlockFont,
            spec(10, 10),
            "A",
            &block(30, 1, TextBlockJustification::Center),
        );
        let columns = covered_columns(&rasterise(&center), 7);
        assert_eq!(columns.first(), Some(&12));
    }

    #[test]
    fn test_block_hanging_indent() {
        let mut indented = block(20, 2, TextBlockJustification::Left);
        indented.hanging_indent = 4;
        let text = layout_block(&BlockFont, spec(10, 10), "AA BB", &indented);
        let pixmap = rasterise(&text);
        assert_eq!(covered_columns(&pixmap, 7).first(), Some(&0));
        assert_eq!(covered_columns(&pixmap, 17).first(), Some(&4));
    }
}
