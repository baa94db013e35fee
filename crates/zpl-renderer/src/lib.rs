#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! ZPL Renderer
//!
//! Positions in the label model are printer dots; one dot becomes one
//! pixel of the output image.

mod barcode;
pub mod canvas;
pub mod error;
pub mod renderer;
pub mod shapes;
pub mod text;

// Re-exports for convenience
pub use canvas::{Bounds, Canvas, Ink, orientation_transform};
pub use error::{RenderError, Result};
pub use renderer::{DEFAULT_FONT_DIR, RenderOptions, RenderOutput, Renderer, render};
pub use text::{FontRegistry, FontRole, GlyphBitmap, GlyphSource, VerticalMetrics};
