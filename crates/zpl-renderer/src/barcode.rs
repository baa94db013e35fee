//! Barcode symbols with their interpretation line.

use tiny_skia::{Paint, Pixmap, Rect, Transform};
use zpl_interpreter::{FontSpec, Symbol, Symbology};

use crate::text::{FontRegistry, FontRole, TextLayout, layout_line};

/// A laid out barcode, unrotated.
pub(crate) struct SymbolLayout<'a> {
    bars: Vec<Rect>,
    lines: Vec<(TextLayout<'a>, f32, f32)>,
    /// Width in dots
    pub width: usize,
    /// Height in dots
    pub height: usize,
    /// Column of the first bar; EAN-13 prints its first digit left of it
    pub bars_left: usize,
    /// Row below the last bar row
    pub bars_bottom: usize,
}

impl SymbolLayout<'_> {
    /// Draws bars and text with `transform` mapping symbol coordinates to
    /// the pixmap.
    pub(crate) fn draw(&self, pixmap: &mut Pixmap, paint: &Paint<'_>, transform: Transform) {
        for bar in &self.bars {
            pixmap.fill_rect(*bar, paint, transform, None);
        }
        for (line, left, top) in &self.lines {
            line.draw(pixmap, transform.pre_translate(*left, *top));
        }
    }
}

fn font_name(symbology: Symbology) -> char {
    match symbology {
        Symbology::Ean13 | Symbology::Ean8 => 'E',
        Symbology::Code39 | Symbology::Code128 => '0',
    }
}

/// Rectangles of the dark bar runs, `left` dots in.
fn bar_rects(bars: &[bool], left: usize, top: usize, height: usize) -> Vec<Rect> {
    let mut rects = Vec::new();
    let mut x = left;
    for run in bars.chunk_by(|a, b| a == b) {
        if run[0] {
            rects.extend(Rect::from_xywh(x as f32, top as f32, run.len() as f32, height as f32));
        }
        x += run.len();
    }
    rects
}

/// Lays out the bars and, when a font is available, the interpretation line.
pub(crate) fn layout_symbol<'a>(symbol: &Symbol, fonts: &'a FontRegistry) -> SymbolLayout<'a> {
    let role = FontRole::for_font_name(font_name(symbol.symbology));
    let font = if symbol.interpretation.is_empty() {
        None
    } else {
        let font = fonts.resolve(role);
        if font.is_none() {
            tracing::warn!(symbology = ?symbol.symbology, "no font for interpretation line");
        }
        font
    };

    let bars_left = symbol
        .interpretation
        .iter()
        .map(|group| group.x)
        .min()
        .map_or(0, |x| x.min(0).unsigned_abs() as usize);
    let right = symbol
        .interpretation
        .iter()
        .map(|group| group.x + group.width as i32)
        .max()
        .map_or(0, |x| x.max(0) as usize)
        .max(symbol.width());

    let spec = FontSpec {
        name: font_name(symbol.symbology),
        height: symbol.text_height,
        width: symbol.text_height,
    };
    let texts: Vec<_> = match font {
        Some(font) => symbol
            .interpretation
            .iter()
            .map(|group| (group, layout_line(font, spec, &group.text)))
            .collect(),
        None => Vec::new(),
    };

    let gap = symbol.text_height / 5;
    let text_height = texts
        .iter()
        .map(|(_, text)| text.height)
        .max()
        .map_or(0, |height| height + gap);
    let text_width = texts
        .iter()
        .map(|(group, text)| bars_left as i64 + i64::from(group.x) + text.width as i64)
        .max()
        .unwrap_or(0)
        .max(0) as usize;

    let (bars_top, text_top) = if symbol.text_above {
        (text_height, 0)
    } else {
        (0, symbol.height + gap)
    };

    let lines = texts
        .into_iter()
        .map(|(group, text)| {
            let slack = group.width as i64 - text.width as i64;
            let left = bars_left as i64 + i64::from(group.x) + slack.max(0) / 2;
            (text, left as f32, text_top as f32)
        })
        .collect();

    SymbolLayout {
        bars: bar_rects(&symbol.bars, bars_left, bars_top, symbol.height),
        lines,
        width: (bars_left + right).max(text_width),
        height: symbol.height + text_height,
        bars_left,
        bars_bottom: bars_top + symbol.height,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tiny_skia::Color;
    use zpl_interpreter::InterpretationText;

    use super::*;
    use crate::text::testing::BlockFont;

    fn symbol(interpretation: Vec<InterpretationText>, text_above: bool) -> Symbol {
        Symbol {
            symbology: Symbology::Code128,
            bars: vec![true, false, true, true],
            height: 20,
            interpretation,
            text_height: 10,
            text_above,
        }
    }

    fn line(text: &str, x: i32, width: usize) -> InterpretationText {
        InterpretationText {
            text: text.to_string(),
            x,
            width,
        }
    }

    /// Draws a layout on a transparent pixmap and reports covered pixels.
    struct Raster(Pixmap);

    impl Raster {
        fn draw(layout: &SymbolLayout<'_>) -> Self {
            let mut pixmap = Pixmap::new(layout.width as u32, layout.height as u32).unwrap();
            let mut paint = Paint::default();
            paint.set_color(Color::BLACK);
            layout.draw(&mut pixmap, &paint, Transform::identity());
            Self(pixmap)
        }

        fn covered(&self, x: u32, y: u32) -> bool {
            self.0.pixel(x, y).unwrap().alpha() >= 128
        }

        fn row_is_blank(&self, y: u32) -> bool {
            (0..self.0.width()).all(|x| !self.covered(x, y))
        }
    }

    #[test]
    fn test_bars_only() {
        let fonts = FontRegistry::new();
        let layout = layout_symbol(&symbol(Vec::new(), false), &fonts);
        assert_eq!((layout.width, layout.height), (4, 20));
        assert_eq!(layout.bars_bottom, 20);
        assert_eq!(layout.bars.len(), 2);
        let raster = Raster::draw(&layout);
        assert!(raster.covered(0, 0));
        assert!(!raster.covered(1, 19));
        assert!(raster.covered(3, 19));
    }

    #[test]
    fn test_missing_font_skips_text() {
        let fonts = FontRegistry::new();
        let layout = layout_symbol(&symbol(vec![line("A", 0, 4)], false), &fonts);
        assert_eq!(layout.height, 20);
        assert!(layout.lines.is_empty());
    }

    #[test]
    fn test_text_below_bars() {
        let fonts = FontRegistry::new().with_font(FontRole::Sans, BlockFont);
        let layout = layout_symbol(&symbol(vec![line("A", 0, 4)], false), &fonts);
        // gap of 2, then a 10 dot line
        assert_eq!(layout.height, 32);
        assert_eq!(layout.bars_bottom, 20);
        let raster = Raster::draw(&layout);
        assert!(raster.row_is_blank(20));
        assert!(raster.row_is_blank(21));
        assert!(raster.covered(0, 29));
    }

    #[test]
    fn test_text_above_bars() {
        let fonts = FontRegistry::new().with_font(FontRole::Sans, BlockFont);
        let layout = layout_symbol(&symbol(vec![line("A", 0, 4)], true), &fonts);
        assert_eq!(layout.bars_bottom, 32);
        let raster = Raster::draw(&layout);
        assert!(raster.covered(0, 12));
        assert!(!raster.covered(1, 31));
    }

    #[test]
    fn test_leading_group_pads_left() {
        let fonts = FontRegistry::new().with_font(FontRole::Ocr, BlockFont);
        let mut ean = symbol(vec![line("5", -7, 7), line("901", 1, 3)], false);
        ean.symbology = Symbology::Ean13;
        let layout = layout_symbol(&ean, &fonts);
        assert_eq!(layout.bars_left, 7);
        let raster = Raster::draw(&layout);
        assert!(raster.covered(7, 0));
        assert!(!raster.covered(6, 0));
    }
}
