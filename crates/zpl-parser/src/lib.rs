#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! ZPL Parser
//!
//! Turns the body of a `^XA ... ^XZ` format into [`ZplFormatCommand`]s.

pub mod commands;
pub mod error;
pub mod parse;

// Re-exports for convenience
pub use commands::{
    BarcodeType, Code128Mode, Color, CompressionType, DiagonalDirection, GraphicData,
    GraphicEncoding, Justification, Orientation, TextBlockJustification, ZplFormatCommand,
};
pub use error::{ParseError, Result};
pub use parse::{parse_labels, parse_zpl};
