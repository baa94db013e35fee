//! Code 39 (`^B3`).
//!
//! Bars come from the `rxing` Code 39 writer, which draws wide elements two
//! modules wide; they are widened to the `^BY` ratio afterwards.

use rxing::{BarcodeFormat, EncodeHints, oned::Code39Writer};

use super::encode_modules;
use crate::error::{InterpretError, Result};

const SYMBOLOGY: &str = "Code 39";

/// Characters in mod-43 value order.
const ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

fn value_of(c: char) -> Option<usize> {
    ALPHABET.find(c)
}

/// Mod-43 check character of `data`.
pub(crate) fn check_character(data: &str) -> Result<char> {
    let mut sum = 0;
    for c in data.chars() {
        sum += value_of(c).ok_or_else(|| unsupported(c))?;
    }
    ALPHABET
        .chars()
        .nth(sum % 43)
        .ok_or_else(|| InterpretError::barcode(SYMBOLOGY, "check character out of range"))
}

fn unsupported(c: char) -> InterpretError {
    InterpretError::barcode(SYMBOLOGY, format!("unsupported character '{c}'"))
}

/// Encodes `data` into dot columns and the human readable text.
///
/// Lowercase letters are printed as uppercase. Narrow elements are `module`
/// dots wide, wide elements `module * ratio`.
pub(crate) fn encode(
    data: &str,
    check_digit: bool,
    module: usize,
    ratio: f32,
) -> Result<(Vec<bool>, String)> {
    let mut text = data.to_ascii_uppercase();
    if text.is_empty() {
        return Err(InterpretError::barcode(SYMBOLOGY, "no data"));
    }
    if let Some(c) = text.chars().find(|c| value_of(*c).is_none()) {
        return Err(unsupported(c));
    }
    if check_digit {
        let check = check_character(&text)?;
        text.push(check);
    }

    let modules = encode_modules(
        &Code39Writer::default(),
        &text,
        BarcodeFormat::CODE_39,
        EncodeHints::default(),
        SYMBOLOGY,
    )?;

    let narrow = module.max(1);
    let wide = ((narrow as f32 * ratio).round() as usize).max(narrow + 1);
    let bars = modules
        .chunk_by(|a, b| a == b)
        .flat_map(|run| {
            let width = if run.len() > 1 { wide } else { narrow };
            std::iter::repeat_n(run[0], width)
        })
        .collect();

    Ok((bars, format!("*{text}*")))
}
