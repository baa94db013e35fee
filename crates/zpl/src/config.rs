//! Viewer configuration.
//!
//! The file is looked up in this order: an explicit path, the `ZPL_CONFIG`
//! environment variable, then `<config dir>/zpl/config.toml`. A missing
//! file yields the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zpl_renderer::{FontRegistry, FontRole, RenderOptions};

use crate::error::{Error, Result};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "ZPL_CONFIG";

/// Name of the configuration directory and of the CLI.
pub const PROJECT_NAME: &str = "zpl";

/// Canvas settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Dots per millimetre
    pub dpmm: u32,
    /// Label width in millimetres when `^PW` is missing
    pub default_width_mm: u32,
    /// Label height in millimetres when `^LL` is missing
    pub default_height_mm: u32,
    /// Gray level below which pixels print black; anti-aliased output when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            dpmm: options.dpmm,
            default_width_mm: options.width_mm,
            default_height_mm: options.height_mm,
            threshold: options.threshold,
        }
    }
}

/// Font files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Directory holding the standard font layout
    pub dir: PathBuf,
    /// Sans face, overrides the one below `dir`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sans: Option<PathBuf>,
    /// Monospace face, overrides the one below `dir`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mono: Option<PathBuf>,
    /// OCR-B face, overrides the one below `dir`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(zpl_renderer::DEFAULT_FONT_DIR),
            sans: None,
            mono: None,
            ocr: None,
        }
    }
}

impl FontConfig {
    fn override_for(&self, role: FontRole) -> Option<&Path> {
        match role {
            FontRole::Sans => self.sans.as_deref(),
            FontRole::Mono => self.mono.as_deref(),
            FontRole::Ocr => self.ocr.as_deref(),
        }
    }
}

/// Configuration file contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZplConfig {
    /// `[render]` section
    pub render: RenderConfig,
    /// `[fonts]` section
    pub fonts: FontConfig,
}

impl ZplConfig {
    /// `<config dir>/zpl/config.toml`, if the platform has a config dir.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join("config.toml"))
    }

    /// The configuration file to use.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        resolve_path(explicit, std::env::var(CONFIG_ENV).ok())
    }

    /// Loads the resolved configuration file, or the defaults when there is
    /// none.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid configuration.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Writes the configuration, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
        }
        std::fs::write(path, self.to_toml_string()?).map_err(|e| Error::io_with_path(e, path))
    }

    /// TOML text of the configuration.
    ///
    /// # Errors
    ///
    /// Fails when serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Rejects values no label can be drawn with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        let render = &self.render;
        for (key, value) in [
            ("render.dpmm", render.dpmm),
            ("render.default_width_mm", render.default_width_mm),
            ("render.default_height_mm", render.default_height_mm),
        ] {
            if value == 0 {
                return Err(Error::config(format!("{key} must be greater than 0")));
            }
        }
        Ok(())
    }

    /// Canvas settings for the renderer.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width_mm: self.render.default_width_mm,
            height_mm: self.render.default_height_mm,
            dpmm: self.render.dpmm,
            threshold: self.render.threshold,
        }
    }

    /// Loads the configured fonts. Fonts that cannot be loaded are logged
    /// and left out.
    pub fn font_registry(&self) -> FontRegistry {
        let mut registry = FontRegistry::new();
        for role in FontRole::ALL {
            let path = self
                .fonts
                .override_for(role)
                .map_or_else(|| self.fonts.dir.join(role.default_file()), Path::to_path_buf);
            if let Err(err) = registry.load_file(role, &path) {
                tracing::warn!(role = ?role, error = %err, "font not loaded");
            }
        }
        registry
    }
}

fn resolve_path(explicit: Option<&str>, env: Option<String>) -> Option<PathBuf> {
    explicit
        .map(PathBuf::from)
        .or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
        .or_else(ZplConfig::default_config_path)
}
