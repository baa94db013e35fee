#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! ZPL Interpreter
//!
//! Label-wide settings (`^PW`, `^LL`, `^LH`, `^LS`, `^LR`, `^PO`, `^CF`,
//! `^BY`, `^CI`) persist for the whole format, field settings (position,
//! `^A`, `^FR`, `^FB`, `^FH`, pending barcode) are reset by `^FS`.

pub mod barcode;
pub mod error;
pub mod field_data;
pub mod graphic;
pub mod label;
pub mod state;

// Re-exports for convenience
pub use barcode::{BarcodeDefaults, encode_barcode};
pub use error::{InterpretError, Result};
pub use field_data::{CharacterSet, decode_field_data};
pub use graphic::decode_graphic;
pub use label::{
    Anchor, Bitmap, FieldPosition, FontSpec, InterpretationText, Label, LabelElement, Symbol,
    Symbology, TextBlock,
};
pub use state::interpret;
