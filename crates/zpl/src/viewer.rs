//! One-call pipeline from ZPL text to PNG.

use std::path::Path;

use zpl_interpreter::{Label, interpret};
use zpl_parser::{parse_labels, parse_zpl};
use zpl_renderer::{RenderOutput, Renderer};

use crate::config::ZplConfig;
use crate::error::{Error, Result};

/// Parses, interprets and renders labels with one set of fonts and canvas
/// settings.
#[derive(Debug, Clone, Default)]
pub struct ZplViewer {
    renderer: Renderer,
}

impl ZplViewer {
    /// Creates a viewer, loading the configured fonts.
    pub fn new(config: &ZplConfig) -> Self {
        Self::with_renderer(Renderer::new(config.font_registry(), config.render_options()))
    }

    /// Creates a viewer around an existing renderer.
    pub fn with_renderer(renderer: Renderer) -> Self {
        Self { renderer }
    }

    /// The renderer used for drawing.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Renders the last label of `input`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for invalid ZPL and [`Error::Render`] when
    /// the label cannot be drawn.
    pub fn parse_and_render(&self, input: &str) -> Result<RenderOutput> {
        let label = interpret(&parse_zpl(input)?);
        self.render_label(&label)
    }

    /// Renders every label of `input`, in order.
    ///
    /// # Errors
    ///
    /// Fails on the first label that cannot be parsed or drawn.
    pub fn render_all(&self, input: &str) -> Result<Vec<RenderOutput>> {
        parse_labels(input)?
            .iter()
            .map(|commands| self.render_label(&interpret(commands)))
            .collect()
    }

    /// Renders an interpreted label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] when the label cannot be drawn.
    pub fn render_label(&self, label: &Label) -> Result<RenderOutput> {
        let output = self.renderer.render(label)?;
        tracing::debug!(
            width = output.width,
            height = output.height,
            bytes = output.png.len(),
            "label rendered"
        );
        Ok(output)
    }

    /// Reads a ZPL file and renders its last label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read, otherwise as
    /// [`ZplViewer::parse_and_render`].
    pub fn render_file(&self, path: &Path) -> Result<RenderOutput> {
        let input = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        self.parse_and_render(&input)
    }
}
