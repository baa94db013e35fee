use serde::Serialize;

use super::Orientation;

/// Code 128 encoding mode, last `^BC` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Code128Mode {
    /// `N`, subset B unless invocation codes say otherwise
    #[default]
    Normal,
    /// `U`, UCC case mode
    Ucc,
    /// `A`, automatic subset selection
    Auto,
    /// `D`, GS1 / UCC/EAN-128
    Ean,
}

impl Code128Mode {
    /// Maps the ZPL mode letter, unknown letters select `Normal`.
    pub fn from_char(value: char) -> Self {
        match value.to_ascii_uppercase() {
            'U' => Code128Mode::Ucc,
            'A' => Code128Mode::Auto,
            'D' => Code128Mode::Ean,
            _ => Code128Mode::Normal,
        }
    }
}

/// Barcode selected for the next `^FD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarcodeType {
    /// `^B3`
    Code39 {
        /// Field orientation
        orientation: Orientation,
        /// Append the mod-43 check digit
        check_digit: bool,
        /// Bar height, `^BY` height when absent
        height: Option<usize>,
        /// Print the interpretation line
        show_text: bool,
        /// Print the interpretation line above the bars
        text_above: bool,
    },
    /// `^BC`
    Code128 {
        /// Field orientation
        orientation: Orientation,
        /// Bar height, `^BY` height when absent
        height: Option<usize>,
        /// Print the interpretation line
        show_text: bool,
        /// Print the interpretation line above the bars
        text_above: bool,
        /// Append a mod-10 check digit to the data; UCC mode always has one
        check_digit: bool,
        /// Subset selection mode
        mode: Code128Mode,
    },
    /// `^BE`
    Ean13 {
        /// Field orientation
        orientation: Orientation,
        /// Bar height, `^BY` height when absent
        height: Option<usize>,
        /// Print the interpretation line
        show_text: bool,
        /// Print the interpretation line above the bars
        text_above: bool,
    },
    /// `^B8`
    Ean8 {
        /// Field orientation
        orientation: Orientation,
        /// Bar height, `^BY` height when absent
        height: Option<usize>,
        /// Print the interpretation line
        show_text: bool,
        /// Print the interpretation line above the bars
        text_above: bool,
    },
}

impl BarcodeType {
    /// Explicit bar height of the command.
    pub fn height(&self) -> Option<usize> {
        match self {
            BarcodeType::Code39 { height, .. }
            | BarcodeType::Code128 { height, .. }
            | BarcodeType::Ean13 { height, .. }
            | BarcodeType::Ean8 { height, .. } => *height,
        }
    }

    /// Whether the interpretation line is printed.
    pub fn show_text(&self) -> bool {
        match self {
            BarcodeType::Code39 { show_text, .. }
            | BarcodeType::Code128 { show_text, .. }
            | BarcodeType::Ean13 { show_text, .. }
            | BarcodeType::Ean8 { show_text, .. } => *show_text,
        }
    }

    /// Whether the interpretation line goes above the bars.
    pub fn text_above(&self) -> bool {
        match self {
            BarcodeType::Code39 { text_above, .. }
            | BarcodeType::Code128 { text_above, .. }
            | BarcodeType::Ean13 { text_above, .. }
            | BarcodeType::Ean8 { text_above, .. } => *text_above,
        }
    }

    /// Field orientation.
    pub fn orientation(&self) -> Orientation {
        match self {
            BarcodeType::Code39 { orientation, .. }
            | BarcodeType::Code128 { orientation, .. }
            | BarcodeType::Ean13 { orientation, .. }
            | BarcodeType::Ean8 { orientation, .. } => *orientation,
        }
    }
}
