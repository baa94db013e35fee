//! The interpreted label: absolute positions and ready-to-draw content.

use serde::Serialize;
use zpl_parser::{Color, DiagonalDirection, Justification, Orientation, TextBlockJustification};

/// Largest width, height or line thickness of a drawn element in dots.
pub const MAX_FIELD_DOTS: usize = 32_000;

/// Which corner of an element its field position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Anchor {
    /// `^FO`: top-left corner
    #[default]
    Origin,
    /// `^FT`: text baseline, or bottom-left corner of other elements
    Typeset,
}

/// Position of a field in dots, label home and shift already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FieldPosition {
    /// Horizontal position
    pub x: i32,
    /// Vertical position
    pub y: i32,
    /// Corner the position refers to
    pub anchor: Anchor,
    /// Field justification
    pub justification: Justification,
}

/// Font selection of a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontSpec {
    /// ZPL font name
    pub name: char,
    /// Character height in dots
    pub height: usize,
    /// Character width in dots
    pub width: usize,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            name: 'A',
            height: 10,
            width: 10,
        }
    }
}

/// `^FB` text block of a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    /// Block width in dots
    pub width: usize,
    /// Maximum number of lines
    pub lines: usize,
    /// Extra space between lines in dots
    pub line_spacing: isize,
    /// Line justification
    pub justification: TextBlockJustification,
    /// Indent of continuation lines in dots
    pub hanging_indent: usize,
}

/// Monochrome bitmap, one byte per pixel, 1 = black, row major.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Bitmap {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// `width * height` pixels
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Whether the pixel at `x`, `y` is black; outside pixels are white.
    pub fn is_black(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x] != 0
    }
}

/// Barcode symbology of an encoded [`Symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Symbology {
    /// Code 39
    Code39,
    /// Code 128
    Code128,
    /// EAN-13
    Ean13,
    /// EAN-8
    Ean8,
}

/// A group of human readable characters printed with a barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpretationText {
    /// Characters of the group
    pub text: String,
    /// Left edge of the group relative to the first bar, in dots
    pub x: i32,
    /// Width the group is centered in, in dots
    pub width: usize,
}

/// An encoded one-dimensional barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// Symbology
    pub symbology: Symbology,
    /// One entry per dot column, `true` = bar
    pub bars: Vec<bool>,
    /// Bar height in dots
    pub height: usize,
    /// Human readable groups, empty when the line is not printed
    pub interpretation: Vec<InterpretationText>,
    /// Character height of the interpretation line in dots
    pub text_height: usize,
    /// Print the interpretation line above the bars
    pub text_above: bool,
}

impl Symbol {
    /// Width of the bars in dots.
    pub fn width(&self) -> usize {
        self.bars.len()
    }
}

/// A drawable field of the label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub enum LabelElement {
    /// `^FD` printed with a font
    Text {
        /// Field position
        position: FieldPosition,
        /// Font
        font: FontSpec,
        /// Rotation
        orientation: Orientation,
        /// Decoded text
        content: String,
        /// Text block, if `^FB` was given
        block: Option<TextBlock>,
        /// Reverse print
        reverse: bool,
    },
    /// `^GB`
    Box {
        /// Field position
        position: FieldPosition,
        /// Width in dots
        width: usize,
        /// Height in dots
        height: usize,
        /// Border thickness in dots
        thickness: usize,
        /// Line color
        color: Color,
        /// Corner rounding, 0 to 8
        rounding: u8,
        /// Reverse print
        reverse: bool,
    },
    /// `^GE` and `^GC`
    Ellipse {
        /// Field position
        position: FieldPosition,
        /// Width in dots
        width: usize,
        /// Height in dots
        height: usize,
        /// Border thickness in dots
        thickness: usize,
        /// Line color
        color: Color,
        /// Reverse print
        reverse: bool,
    },
    /// `^GD`
    Diagonal {
        /// Field position
        position: FieldPosition,
        /// Width of the bounding box in dots
        width: usize,
        /// Height of the bounding box in dots
        height: usize,
        /// Line thickness in dots
        thickness: usize,
        /// Line color
        color: Color,
        /// Lean of the line
        direction: DiagonalDirection,
        /// Reverse print
        reverse: bool,
    },
    /// `^GF`
    Image {
        /// Field position
        position: FieldPosition,
        /// Decoded bitmap
        bitmap: Bitmap,
        /// Reverse print
        reverse: bool,
    },
    /// `^FD` after a barcode command
    Barcode {
        /// Field position
        position: FieldPosition,
        /// Rotation
        orientation: Orientation,
        /// Encoded bars and interpretation line
        symbol: Symbol,
        /// Reverse print
        reverse: bool,
    },
}

impl LabelElement {
    /// Field position of the element.
    pub fn position(&self) -> FieldPosition {
        match self {
            LabelElement::Text { position, .. }
            | LabelElement::Box { position, .. }
            | LabelElement::Ellipse { position, .. }
            | LabelElement::Diagonal { position, .. }
            | LabelElement::Image { position, .. }
            | LabelElement::Barcode { position, .. } => *position,
        }
    }

    /// Whether the element inverts what lies beneath it.
    pub fn reverse(&self) -> bool {
        match self {
            LabelElement::Text { reverse, .. }
            | LabelElement::Box { reverse, .. }
            | LabelElement::Ellipse { reverse, .. }
            | LabelElement::Diagonal { reverse, .. }
            | LabelElement::Image { reverse, .. }
            | LabelElement::Barcode { reverse, .. } => *reverse,
        }
    }
}

/// An interpreted `^XA ... ^XZ` format.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Label {
    /// `^PW` print width in dots, 0 when not set
    pub width: usize,
    /// `^LL` label length in dots, 0 when not set
    pub height: usize,
    /// `^PO I`: the label prints upside down
    pub inverted: bool,
    /// Fields in print order
    pub elements: Vec<LabelElement>,
}
