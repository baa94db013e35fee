//! One-dimensional barcode encoders.
//!
//! The bar patterns come from the `rxing` one-dimensional writers. This
//! module turns ZPL field data into writer input, scales the modules to the
//! `^BY` module width and lays out the interpretation line.

mod code128;
mod code39;
mod ean;

use rxing::{BarcodeFormat, EncodeHintValue, EncodeHints, Writer};
use zpl_parser::BarcodeType;

use crate::error::{InterpretError, Result};
use crate::label::{InterpretationText, MAX_FIELD_DOTS, Symbol, Symbology};

/// Interpretation line character height per dot of module width.
const TEXT_HEIGHT_PER_MODULE: usize = 9;

/// Smallest interpretation line character height in dots.
const MIN_TEXT_HEIGHT: usize = 10;

/// `^BY` barcode defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarcodeDefaults {
    /// Module (narrow bar) width in dots
    pub module_width: usize,
    /// Wide to narrow ratio
    pub ratio: f32,
    /// Bar height in dots
    pub height: usize,
}

impl Default for BarcodeDefaults {
    fn default() -> Self {
        Self {
            module_width: 2,
            ratio: 3.0,
            height: 10,
        }
    }
}

/// Mod-10 check digit of UCC, GS1 and EAN numbers, weights 3 and 1 from the right.
pub(crate) fn mod10_check_digit(digits: &str) -> u32 {
    let sum: u32 = digits
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { d })
        .sum();
    (10 - sum % 10) % 10
}

/// Modules of a symbol without quiet zones, `true` = bar.
fn encode_modules(
    writer: &impl Writer,
    contents: &str,
    format: BarcodeFormat,
    hints: EncodeHints,
    symbology: &'static str,
) -> Result<Vec<bool>> {
    let hints = hints.with(EncodeHintValue::Margin("0".into()));
    // one pixel per module, one row
    let matrix = writer
        .encode_with_hints(contents, &format, 1, 1, &hints)
        .map_err(|e| InterpretError::barcode(symbology, e.to_string()))?;
    Ok((0..matrix.width()).map(|x| matrix.get(x, 0)).collect())
}

fn scale(modules: &[bool], module_width: usize) -> Vec<bool> {
    modules
        .iter()
        .flat_map(|bar| std::iter::repeat_n(*bar, module_width))
        .collect()
}

fn group(text: &str, x: usize, width: usize, module_width: usize) -> InterpretationText {
    InterpretationText {
        text: text.to_string(),
        // module offsets are small
        x: (x * module_width) as i32,
        width: width * module_width,
    }
}

/// Encodes field data with the barcode settings of the field.
///
/// # Errors
///
/// Returns [`InterpretError::Barcode`] when the data cannot be represented.
pub fn encode_barcode(barcode: &BarcodeType, data: &str, defaults: &BarcodeDefaults) -> Result<Symbol> {
    let module = defaults.module_width.max(1);

    let (symbology, bars, mut interpretation) = match *barcode {
        BarcodeType::Code39 { check_digit, .. } => {
            let (bars, text) = code39::encode(data, check_digit, module, defaults.ratio)?;
            let line = vec![InterpretationText {
                text,
                x: 0,
                width: bars.len(),
            }];
            (Symbology::Code39, bars, line)
        }
        BarcodeType::Code128 {
            mode, check_digit, ..
        } => {
            let (modules, text) = code128::encode(data, mode, check_digit)?;
            let bars = scale(&modules, module);
            let line = vec![InterpretationText {
                text,
                x: 0,
                width: bars.len(),
            }];
            (Symbology::Code128, bars, line)
        }
        BarcodeType::Ean13 { .. } => {
            let (modules, digits) = ean::ean13(data)?;
            let line = vec![
                InterpretationText {
                    text: digits[..1].to_string(),
                    x: -((7 * module) as i32),
                    width: 7 * module,
                },
                group(&digits[1..7], 3, 42, module),
                group(&digits[7..], 50, 42, module),
            ];
            (Symbology::Ean13, scale(&modules, module), line)
        }
        BarcodeType::Ean8 { .. } => {
            let (modules, digits) = ean::ean8(data)?;
            let line = vec![
                group(&digits[..4], 3, 28, module),
                group(&digits[4..], 36, 28, module),
            ];
            (Symbology::Ean8, scale(&modules, module), line)
        }
    };

    if !barcode.show_text() {
        interpretation.clear();
    }

    Ok(Symbol {
        symbology,
        bars,
        height: barcode
            .height()
            .unwrap_or(defaults.height)
            .min(MAX_FIELD_DOTS),
        interpretation,
        text_height: (module * TEXT_HEIGHT_PER_MODULE).max(MIN_TEXT_HEIGHT),
        text_above: barcode.text_above(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zpl_parser::{Code128Mode, Orientation};

    use super::*;

    fn code128(height: Option<usize>, show_text: bool) -> BarcodeType {
        BarcodeType::Code128 {
            orientation: Orientation::Normal,
            height,
            show_text,
            text_above: false,
            check_digit: false,
            mode: Code128Mode::Normal,
        }
    }

    fn ean13() -> BarcodeType {
        BarcodeType::Ean13 {
            orientation: Orientation::Normal,
            height: Some(50),
            show_text: true,
            text_above: false,
        }
    }

    #[test]
    fn test_mod10_check_digit() {
        assert_eq!(mod10_check_digit("000012345678"), 4);
        assert_eq!(mod10_check_digit("400638133393"), 1);
    }

    #[test]
    fn test_height_falls_back_to_defaults() {
        let defaults = BarcodeDefaults {
            module_width: 3,
            ratio: 3.0,
            height: 77,
        };
        let symbol = encode_barcode(&code128(None, true), "AB", &defaults).unwrap();
        assert_eq!(symbol.height, 77);
        let symbol = encode_barcode(&code128(Some(40), true), "AB", &defaults).unwrap();
        assert_eq!(symbol.height, 40);
    }

    #[test]
    fn test_module_width_scales_bars() {
        let narrow = BarcodeDefaults {
            module_width: 1,
            ..BarcodeDefaults::default()
        };
        let wide = BarcodeDefaults {
            module_width: 3,
            ..BarcodeDefaults::default()
        };
        let a = encode_barcode(&code128(None, true), "Hello", &narrow).unwrap();
        let b = encode_barcode(&code128(None, true), "Hello", &wide).unwrap();
        assert_eq!(a.width() * 3, b.width());
        assert_eq!(a.interpretation[0].text, "Hello");
        assert_eq!(b.interpretation[0].width, b.width());
    }

    #[test]
    fn test_hidden_interpretation_line() {
        let symbol =
            encode_barcode(&code128(None, false), "AB", &BarcodeDefaults::default()).unwrap();
        assert!(symbol.interpretation.is_empty());
    }

    #[test]
    fn test_ean13_interpretation_groups() {
        let defaults = BarcodeDefaults::default();
        let symbol = encode_barcode(&ean13(), "400638133393", &defaults).unwrap();
        assert_eq!(symbol.width(), 95 * 2);
        let groups: Vec<&str> = symbol
            .interpretation
            .iter()
            .map(|g| g.text.as_str())
            .collect();
        assert_eq!(groups, vec!["4", "006381", "333931"]);
        assert_eq!(symbol.interpretation[0].x, -14);
        assert_eq!(symbol.interpretation[2].x, 100);
    }

    #[test]
    fn test_ean8_interpretation_groups() {
        let barcode = BarcodeType::Ean8 {
            orientation: Orientation::Normal,
            height: None,
            show_text: true,
            text_above: true,
        };
        let symbol = encode_barcode(&barcode, "9638507", &BarcodeDefaults::default()).unwrap();
        assert_eq!(symbol.width(), 67 * 2);
        assert!(symbol.text_above);
        assert_eq!(symbol.interpretation[0].text, "9638");
        assert_eq!(symbol.interpretation[1].text, "5074");
    }

    #[test]
    fn test_bar_height_is_capped() {
        let symbol = encode_barcode(
            &code128(Some(400_000), false),
            "AB",
            &BarcodeDefaults::default(),
        )
        .unwrap();
        assert_eq!(symbol.height, MAX_FIELD_DOTS);
    }

    #[test]
    fn test_code128_check_digit_flag() {
        let barcode = BarcodeType::Code128 {
            orientation: Orientation::Normal,
            height: None,
            show_text: true,
            text_above: false,
            check_digit: true,
            mode: Code128Mode::Normal,
        };
        let symbol = encode_barcode(&barcode, "1234", &BarcodeDefaults::default()).unwrap();
        assert_eq!(symbol.interpretation[0].text, "12348");
        let plain = encode_barcode(&code128(None, true), "1234", &BarcodeDefaults::default())
            .unwrap();
        assert!(symbol.width() > plain.width());
    }

    #[test]
    fn test_code39_error_propagates() {
        let barcode = BarcodeType::Code39 {
            orientation: Orientation::Normal,
            check_digit: false,
            height: None,
            show_text: true,
            text_above: false,
        };
        let err = encode_barcode(&barcode, "a~b", &BarcodeDefaults::default()).unwrap_err();
        assert!(matches!(err, InterpretError::Barcode { symbology: "Code 39", .. }));
    }
}
