//! EAN-13 (`^BE`) and EAN-8 (`^B8`).

use rxing::{
    BarcodeFormat, EncodeHints,
    oned::{EAN8Writer, EAN13Writer},
};

use super::{encode_modules, mod10_check_digit};
use crate::error::Result;

/// Exactly `len` digits: non-digits become `0`, short data is zero padded
/// on the left, long data is cut. The check digit is appended.
fn normalize(data: &str, len: usize) -> String {
    let mut digits: String = data
        .chars()
        .map(|c| if c.is_ascii_digit() { c } else { '0' })
        .collect();
    digits.truncate(len);
    let mut digits = format!("{digits:0>len$}");
    let check = mod10_check_digit(&digits);
    digits.push(char::from_digit(check, 10).unwrap_or('0'));
    digits
}

/// Encodes 12 digits plus check digit, returning modules and the 13 digits.
pub(crate) fn ean13(data: &str) -> Result<(Vec<bool>, String)> {
    let digits = normalize(data, 12);
    let modules = encode_modules(
        &EAN13Writer::default(),
        &digits,
        BarcodeFormat::EAN_13,
        EncodeHints::default(),
        "EAN-13",
    )?;
    Ok((modules, digits))
}

/// Encodes 7 digits plus check digit, returning modules and the 8 digits.
pub(crate) fn ean8(data: &str) -> Result<(Vec<bool>, String)> {
    let digits = normalize(data, 7);
    let modules = encode_modules(
        &EAN8Writer::default(),
        &digits,
        BarcodeFormat::EAN_8,
        EncodeHints::default(),
        "EAN-8",
    )?;
    Ok((modules, digits))
}
