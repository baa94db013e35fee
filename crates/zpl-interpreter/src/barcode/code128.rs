//! Code 128 (`^BC`) field data preparation.
//!
//! In normal mode the field data may carry ZPL invocation codes: `>9`, `>:`
//! and `>;` at the start select subset A, B or C, `>7`, `>6` and `>5` switch
//! subsets, `>8` inserts FNC1 and `><` / `>0` stand for a literal `>`. The
//! codes are translated into `rxing` writer input; data with mid-symbol
//! switches is left to the writer's own subset selection.

use rxing::{BarcodeFormat, EncodeHintValue, EncodeHints, oned::Code128Writer};
use zpl_parser::Code128Mode;

use super::{encode_modules, mod10_check_digit};
use crate::error::{InterpretError, Result};

const SYMBOLOGY: &str = "Code 128";
const UCC_DIGITS: usize = 19;

// writer escapes for the function characters
const FNC1: char = '\u{f1}';
const FNC2: char = '\u{f2}';
const FNC3: char = '\u{f3}';
const DEL: char = '\u{7f}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subset {
    A,
    B,
    C,
}

/// Normal mode field data after invocation code translation.
#[derive(Debug, Default)]
struct Translated {
    start: Option<Subset>,
    switched: bool,
    contents: String,
    text: String,
}

fn invalid(reason: impl Into<String>) -> InterpretError {
    InterpretError::barcode(SYMBOLOGY, reason)
}

/// Translates the invocation codes of normal mode field data.
fn translate(data: &str) -> Result<Translated> {
    let mut out = Translated::default();
    let mut chars = data.chars().peekable();

    while let Some(c) = chars.next() {
        let code = match chars.peek() {
            Some(&code) if c == '>' => code,
            _ => {
                out.contents.push(c);
                out.text.push(c);
                continue;
            }
        };
        match code {
            '9' | ':' | ';' if out.contents.is_empty() && out.start.is_none() => {
                out.start = Some(match code {
                    '9' => Subset::A,
                    ':' => Subset::B,
                    _ => Subset::C,
                });
            }
            '<' | '0' => {
                out.contents.push('>');
                out.text.push('>');
            }
            '=' => {
                out.contents.push('~');
                out.text.push('~');
            }
            '1' => out.contents.push(DEL),
            '2' => out.contents.push(FNC3),
            '3' => out.contents.push(FNC2),
            '4' => return Err(invalid("FNC4 (>4) is not supported")),
            '5' | '6' | '7' => out.switched = true,
            '8' => out.contents.push(FNC1),
            _ => {
                out.contents.push(c);
                out.text.push(c);
                continue;
            }
        }
        chars.next();
    }

    Ok(out)
}

/// Subset C holds digit pairs, optionally separated by FNC1.
fn check_digit_pairs(contents: &str) -> Result<()> {
    for run in contents.split(FNC1) {
        if !run.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("subset C only holds digits"));
        }
        if run.len() % 2 != 0 {
            return Err(invalid("subset C needs an even number of digits"));
        }
    }
    Ok(())
}

fn append_check_digit(contents: &mut String, text: &mut String) {
    let digit = char::from_digit(mod10_check_digit(text), 10).unwrap_or('0');
    contents.push(digit);
    text.push(digit);
}

/// Encodes field data into modules and the human readable text.
pub(crate) fn encode(data: &str, mode: Code128Mode, check_digit: bool) -> Result<(Vec<bool>, String)> {
    let mut hints = EncodeHints::default();

    let (contents, text) = match mode {
        Code128Mode::Normal => {
            let Translated {
                start,
                switched,
                mut contents,
                mut text,
            } = translate(data)?;
            if check_digit {
                append_check_digit(&mut contents, &mut text);
            }
            if !switched {
                match start {
                    Some(Subset::A) => {
                        hints = hints.with(EncodeHintValue::ForceCodeSet("A".into()));
                    }
                    Some(Subset::C) => {
                        check_digit_pairs(&contents)?;
                        hints = hints.with(EncodeHintValue::ForceCodeSet("C".into()));
                    }
                    Some(Subset::B) | None => {}
                }
            }
            (contents, text)
        }
        Code128Mode::Auto => {
            let mut contents = data.to_string();
            let mut text = data.to_string();
            if check_digit {
                append_check_digit(&mut contents, &mut text);
            }
            (contents, text)
        }
        Code128Mode::Ucc => {
            let mut digits: String = data.chars().filter(char::is_ascii_digit).collect();
            digits.truncate(UCC_DIGITS);
            let digits = format!("{digits:0>width$}", width = UCC_DIGITS);
            let digits = format!("{digits}{}", mod10_check_digit(&digits));
            (format!("{FNC1}{digits}"), digits)
        }
        Code128Mode::Ean => {
            let stripped: String = data.chars().filter(|c| !matches!(c, '(' | ')')).collect();
            if stripped.is_empty() {
                return Err(invalid("no data"));
            }
            (format!("{FNC1}{stripped}"), data.to_string())
        }
    };

    if contents.is_empty() {
        return Err(invalid("no data"));
    }

    let modules = encode_modules(
        &Code128Writer::default(),
        &contents,
        BarcodeFormat::CODE_128,
        hints,
        SYMBOLOGY,
    )?;
    Ok((modules, text))
}
