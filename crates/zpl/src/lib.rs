#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! ZPL
//!
//! [`ZplViewer`] renders the last label of a ZPL document
//! ([`ZplViewer::parse_and_render`]) or every label in order
//! ([`ZplViewer::render_all`]). [`assets`] describes the fonts shipped with
//! the project and checks their license files.

pub mod assets;
pub mod config;
pub mod error;
pub mod viewer;

// Re-exports for convenience
pub use assets::{AssetIssue, AssetReport, FontAsset, ProjectLicense, bundled_fonts, check_assets};
pub use config::{CONFIG_ENV, FontConfig, RenderConfig, ZplConfig};
pub use error::{Error, Result};
pub use viewer::ZplViewer;

pub use zpl_interpreter::{Label, interpret};
pub use zpl_parser::{ZplFormatCommand, parse_labels, parse_zpl};
pub use zpl_renderer::{FontRegistry, RenderOptions, RenderOutput, Renderer, render};
