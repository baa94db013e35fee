//! `^GF` payload decoding into a [`Bitmap`].

use std::io::Read;

use base64::{Engine, engine::general_purpose};
use flate2::read::ZlibDecoder;
use zpl_parser::{CompressionType, GraphicData, GraphicEncoding};

use crate::error::{InterpretError, Result};
use crate::label::{Bitmap, MAX_FIELD_DOTS};

/// Widest accepted bitmap row in bytes.
pub const MAX_ROW_BYTES: usize = MAX_FIELD_DOTS / 8;

/// Largest accepted bitmap in packed bytes.
pub const MAX_GRAPHIC_BYTES: usize = 4_000_000;

/// Decodes a `^GF` payload of `total_bytes` packed bytes, `row_bytes` per row.
///
/// # Errors
///
/// Fails for binary payloads, malformed hex, base64 or zlib data, for
/// declared sizes above [`MAX_ROW_BYTES`] or [`MAX_GRAPHIC_BYTES`], and when
/// the payload holds fewer bytes than the declared size.
pub fn decode_graphic(
    compression: CompressionType,
    data: &GraphicData,
    total_bytes: usize,
    row_bytes: usize,
) -> Result<Bitmap> {
    if row_bytes == 0 {
        return Err(InterpretError::graphic("row byte count is zero"));
    }
    if row_bytes > MAX_ROW_BYTES || total_bytes > MAX_GRAPHIC_BYTES {
        return Err(InterpretError::graphic(format!(
            "bitmap too large: {total_bytes} bytes, {row_bytes} per row"
        )));
    }
    let height = total_bytes / row_bytes;
    let expected = row_bytes * height;

    let packed = match (compression, data.encoding) {
        (CompressionType::Ascii, GraphicEncoding::Hex) => decode_hex(&data.data, row_bytes, height)?,
        (_, GraphicEncoding::Z64) => inflate(&decode_base64(&data.data)?, expected)?,
        (_, GraphicEncoding::B64) => decode_base64(&data.data)?,
        (compression, GraphicEncoding::Hex) => {
            return Err(InterpretError::graphic(format!(
                "{compression:?} payloads are not supported"
            )));
        }
    };

    if packed.len() < expected {
        return Err(InterpretError::graphic(format!(
            "bitmap too small: expected {expected} bytes, got {}",
            packed.len()
        )));
    }

    Ok(expand(&packed[..expected], row_bytes, height))
}

fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|e| InterpretError::graphic(format!("invalid base64: {e}")))
}

/// Inflates at most `limit` bytes.
fn inflate(data: &[u8], limit: usize) -> Result<Vec<u8>> {
    // usize fits in u64 on supported targets
    let mut decoder = ZlibDecoder::new(data).take(limit as u64);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| InterpretError::graphic(format!("zlib decompress error: {e}")))?;
    Ok(out)
}

/// Repeat count encoded by a ZPL compression letter.
fn repeat_count(c: char) -> Option<usize> {
    match c {
        'G'..='Y' => Some(c as usize - 'G' as usize + 1),
        'g'..='z' => Some((c as usize - 'g' as usize + 1) * 20),
        _ => None,
    }
}

/// Decodes ASCII hex with ZPL run-length compression into packed bytes.
///
/// Decoding stops after `height` rows.
fn decode_hex(data: &str, row_bytes: usize, height: usize) -> Result<Vec<u8>> {
    let row_nibbles = row_bytes * 2;
    let mut rows: Vec<Vec<u8>> = Vec::new();
    let mut row: Vec<u8> = Vec::with_capacity(row_nibbles);
    let mut count = 0usize;

    for c in data.chars().filter(|c| !c.is_whitespace()) {
        if rows.len() >= height {
            break;
        }
        if let Some(n) = repeat_count(c) {
            count = count.saturating_add(n);
            continue;
        }
        match c {
            ',' | '!' => {
                let fill = if c == ',' { 0 } else { 0xF };
                row.resize(row_nibbles, fill);
                rows.push(std::mem::take(&mut row));
            }
            ':' => {
                let previous = rows.last().cloned().unwrap_or_else(|| vec![0; row_nibbles]);
                rows.push(previous);
            }
            _ => {
                let nibble = c.to_digit(16).ok_or_else(|| {
                    InterpretError::graphic(format!("invalid hex character '{c}'"))
                })?;
                for _ in 0..count.max(1) {
                    // hex digits are < 16
                    row.push(nibble as u8);
                    if row.len() == row_nibbles {
                        rows.push(std::mem::take(&mut row));
                        if rows.len() >= height {
                            break;
                        }
                    }
                }
            }
        }
        count = 0;
    }

    if !row.is_empty() && rows.len() < height {
        row.resize(row_nibbles, 0);
        rows.push(row);
    }

    Ok(rows
        .iter()
        .flat_map(|row| row.chunks(2).map(|pair| pair[0] << 4 | pair[1]))
        .collect())
}

/// Unpacks one bit per pixel, most significant bit first.
fn expand(packed: &[u8], row_bytes: usize, height: usize) -> Bitmap {
    let width = row_bytes * 8;
    let pixels = packed
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |bit| (byte >> bit) & 1))
        .collect();
    Bitmap {
        width,
        height,
        pixels,
    }
}
