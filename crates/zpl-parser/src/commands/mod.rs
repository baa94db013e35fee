//! Typed ZPL commands and their parameter types.

mod barcode;

use serde::Serialize;

pub use barcode::{BarcodeType, Code128Mode};

/// Rotation of a field, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Orientation {
    /// 0°
    #[default]
    Normal,
    /// 90°
    Rotated,
    /// 180°
    Inverted,
    /// 270°
    BottomUp,
}

impl Orientation {
    /// Maps the ZPL orientation letter (`N`, `R`, `I`, `B`).
    pub fn from_char(value: char) -> Option<Self> {
        match value.to_ascii_uppercase() {
            'N' => Some(Orientation::Normal),
            'R' => Some(Orientation::Rotated),
            'I' => Some(Orientation::Inverted),
            'B' => Some(Orientation::BottomUp),
            _ => None,
        }
    }
}

/// Field justification given as the third `^FO`/`^FT` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Justification {
    /// 0
    #[default]
    Left,
    /// 1
    Right,
    /// 2, script dependent
    Auto,
}

impl From<Option<u8>> for Justification {
    fn from(value: Option<u8>) -> Self {
        match value {
            Some(1) => Justification::Right,
            Some(2) => Justification::Auto,
            _ => Justification::Left,
        }
    }
}

/// Line justification inside a `^FB` text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TextBlockJustification {
    /// `L`
    #[default]
    Left,
    /// `R`
    Right,
    /// `C`
    Center,
    /// `J`, last line is left aligned
    Justified,
}

impl From<Option<char>> for TextBlockJustification {
    fn from(value: Option<char>) -> Self {
        match value.map(|c| c.to_ascii_uppercase()) {
            Some('R') => TextBlockJustification::Right,
            Some('C') => TextBlockJustification::Center,
            Some('J') => TextBlockJustification::Justified,
            _ => TextBlockJustification::Left,
        }
    }
}

/// Line color of graphic commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Color {
    /// `B`
    #[default]
    Black,
    /// `W`
    White,
}

impl From<Option<char>> for Color {
    fn from(value: Option<char>) -> Self {
        match value.map(|c| c.to_ascii_uppercase()) {
            Some('W') => Color::White,
            _ => Color::Black,
        }
    }
}

/// Lean of a `^GD` diagonal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DiagonalDirection {
    /// `R` or `/`
    #[default]
    Right,
    /// `L` or `\`
    Left,
}

impl From<Option<char>> for DiagonalDirection {
    fn from(value: Option<char>) -> Self {
        match value.map(|c| c.to_ascii_uppercase()) {
            Some('L') | Some('\\') => DiagonalDirection::Left,
            _ => DiagonalDirection::Right,
        }
    }
}

/// First `^GF` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompressionType {
    /// `A`, ASCII hex or an embedded `:Z64:`/`:B64:` payload
    Ascii,
    /// `B`, raw binary
    Binary,
    /// `C`, compressed binary
    Compressed,
}

impl CompressionType {
    /// Maps the ZPL compression letter.
    pub fn from_char(value: char) -> Option<Self> {
        match value.to_ascii_uppercase() {
            'A' => Some(CompressionType::Ascii),
            'B' => Some(CompressionType::Binary),
            'C' => Some(CompressionType::Compressed),
            _ => None,
        }
    }
}

/// How the payload of a `^GF` command is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GraphicEncoding {
    /// Plain or run-length compressed ASCII hex
    Hex,
    /// `:Z64:` base64 of zlib deflated rows
    Z64,
    /// `:B64:` base64 of the raw rows
    B64,
}

/// Payload of a `^GF` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphicData {
    /// Payload encoding
    pub encoding: GraphicEncoding,
    /// Encoded payload without the `:Z64:`/`:B64:` prefix and CRC suffix
    pub data: String,
    /// CRC suffix of base64 payloads, if present
    pub crc: Option<String>,
}

impl GraphicData {
    /// Splits a raw `^GF` data parameter into encoding, payload and CRC.
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim();
        let (encoding, rest) = if let Some(rest) = strip_prefix_ci(raw, ":Z64:") {
            (GraphicEncoding::Z64, rest)
        } else if let Some(rest) = strip_prefix_ci(raw, ":B64:") {
            (GraphicEncoding::B64, rest)
        } else {
            return GraphicData {
                encoding: GraphicEncoding::Hex,
                data: raw.to_string(),
                crc: None,
            };
        };

        match rest.rsplit_once(':') {
            Some((data, crc)) => GraphicData {
                encoding,
                data: data.to_string(),
                crc: Some(crc.to_string()),
            },
            None => GraphicData {
                encoding,
                data: rest.to_string(),
                crc: None,
            },
        }
    }
}

fn strip_prefix_ci<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

/// A command inside a `^XA ... ^XZ` format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub enum ZplFormatCommand {
    /// `^LL` label length in dots
    LabelLength(usize),
    /// `^PW` print width in dots
    PrintWidth(usize),
    /// `^LS` shift of all fields to the left, in dots
    LabelShift(i32),
    /// `^LH` origin of all field positions
    LabelHome {
        /// Horizontal offset in dots
        x: i32,
        /// Vertical offset in dots
        y: i32,
    },
    /// `^LR` reverse print all fields
    LabelReverse(bool),
    /// `^PO` print orientation, `Normal` or `Inverted`
    PrintOrientation(Orientation),
    /// `^BY` barcode field defaults
    BarcodeDefaults {
        /// Narrow bar / module width in dots
        module_width: u8,
        /// Wide to narrow bar ratio
        ratio: f32,
        /// Bar height in dots
        height: usize,
    },
    /// `^B3`, `^BC`, `^BE`, `^B8`
    Barcode(BarcodeType),
    /// `^CF` default font
    ChangeFont {
        /// Font name
        name: char,
        /// Character height in dots
        height: usize,
        /// Character width in dots
        width: usize,
    },
    /// `^A` font for the current field
    Font {
        /// Font name
        name: char,
        /// Field orientation
        orientation: Orientation,
        /// Character height in dots
        height: usize,
        /// Character width in dots
        width: usize,
    },
    /// `^CI` character set with optional byte remapping
    CharacterSet {
        /// Character set number
        num: u8,
        /// Byte substitutions, source to destination
        mapping: Vec<(u8, u8)>,
    },
    /// `^FO` field origin, top-left corner
    FieldOrigin {
        /// Horizontal position in dots
        x: i32,
        /// Vertical position in dots
        y: i32,
        /// Field justification
        justification: Justification,
    },
    /// `^FT` field typeset, baseline or bottom-left corner
    FieldTypeset {
        /// Horizontal position in dots
        x: i32,
        /// Vertical position in dots
        y: i32,
        /// Field justification
        justification: Justification,
    },
    /// `^FB` text block
    FieldBlock {
        /// Block width in dots
        width: usize,
        /// Maximum number of lines
        lines: usize,
        /// Extra space between lines in dots
        line_spacing: isize,
        /// Line justification
        justification: TextBlockJustification,
        /// Indent of all lines but the first, in dots
        hanging_indent: usize,
    },
    /// `^FH` hexadecimal escape indicator for the current field
    FieldHexIndicator {
        /// Escape character
        indicator: char,
    },
    /// `^FR` reverse print the current field
    FieldReverse,
    /// `^FD` field data
    FieldData(String),
    /// `^FS` field separator
    FieldSeparator,
    /// `^GF` graphic field
    GraphicField {
        /// Payload compression
        compression_type: CompressionType,
        /// Byte count of the payload parameter
        data_bytes: usize,
        /// Byte count of the decoded graphic
        total_bytes: usize,
        /// Bytes per row of the decoded graphic
        row_bytes: usize,
        /// Payload
        data: GraphicData,
    },
    /// `^GB` graphic box
    GraphicBox {
        /// Box width in dots
        width: usize,
        /// Box height in dots
        height: usize,
        /// Border thickness in dots
        thickness: usize,
        /// Line color
        color: Color,
        /// Corner rounding, 0 (none) to 8 (most)
        rounding: u8,
    },
    /// `^GC` graphic circle
    GraphicCircle {
        /// Circle diameter in dots
        diameter: usize,
        /// Border thickness in dots
        thickness: usize,
        /// Line color
        color: Color,
    },
    /// `^GE` graphic ellipse
    GraphicEllipse {
        /// Ellipse width in dots
        width: usize,
        /// Ellipse height in dots
        height: usize,
        /// Border thickness in dots
        thickness: usize,
        /// Line color
        color: Color,
    },
    /// `^GD` graphic diagonal line
    GraphicDiagonal {
        /// Box width in dots
        width: usize,
        /// Box height in dots
        height: usize,
        /// Line thickness in dots
        thickness: usize,
        /// Line color
        color: Color,
        /// Lean of the line
        direction: DiagonalDirection,
    },
}
