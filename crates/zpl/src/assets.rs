//! Licensing of the project and of the fonts it ships with.
//!
//! [`check_assets`] verifies that a checkout carries every license file the
//! README refers to.

use std::fmt;
use std::path::{Path, PathBuf};

/// Sentences every MIT license text contains.
const MIT_MARKERS: [&str; 3] = [
    "Permission is hereby granted, free of charge, to any person obtaining a copy",
    "The above copyright notice and this permission notice shall be included in all",
    "THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND",
];

/// License of the project code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectLicense {
    /// License name
    pub kind: &'static str,
    /// License file relative to the repository root
    pub path: &'static str,
}

/// The project license.
pub const PROJECT_LICENSE: ProjectLicense = ProjectLicense {
    kind: "MIT",
    path: "LICENSE",
};

/// A font distributed with the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontAsset {
    /// Font family name
    pub name: &'static str,
    /// Designer or foundry
    pub author: &'static str,
    /// License name
    pub license: &'static str,
    /// License file relative to the repository root
    pub license_path: &'static str,
    /// Where the font comes from
    pub source_url: &'static str,
    /// Font files relative to the repository root
    pub font_files: &'static [&'static str],
}

const OFL: &str = "SIL OFL 1.1";

static BUNDLED_FONTS: [FontAsset; 3] = [
    FontAsset {
        name: "AdwaitaSans",
        author: "The Adwaita Fonts Project Authors",
        license: OFL,
        license_path: "fonts/AdwaitaSans/LICENSE",
        source_url: "https://gitlab.gnome.org/GNOME/adwaita-fonts",
        font_files: &["fonts/AdwaitaSans/AdwaitaSans-Regular.ttf"],
    },
    FontAsset {
        name: "AdwaitaMono",
        author: "The Adwaita Fonts Project Authors",
        license: OFL,
        license_path: "fonts/AdwaitaMono/LICENSE",
        source_url: "https://gitlab.gnome.org/GNOME/adwaita-fonts",
        font_files: &["fonts/AdwaitaMono/AdwaitaMono-Regular.ttf"],
    },
    FontAsset {
        name: "OCR-B",
        author: "Matthew Skala",
        license: OFL,
        license_path: "fonts/OCRB/LICENSE",
        source_url: "https://tsukurimashou.org/ocr.php.en",
        font_files: &["fonts/OCRB/OCRB.ttf"],
    },
];

/// Fonts the README lists.
pub fn bundled_fonts() -> &'static [FontAsset] {
    &BUNDLED_FONTS
}

/// A problem found by [`check_assets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetIssue {
    /// File concerned
    pub path: PathBuf,
    /// What is wrong with it
    pub problem: String,
}

impl fmt::Display for AssetIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.problem)
    }
}

/// Result of [`check_assets`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetReport {
    /// Files checked
    pub checked: Vec<PathBuf>,
    /// Problems found
    pub issues: Vec<AssetIssue>,
}

impl AssetReport {
    /// Whether every license file is in place.
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    fn issue(&mut self, path: PathBuf, problem: impl Into<String>) {
        self.issues.push(AssetIssue {
            path,
            problem: problem.into(),
        });
    }
}

/// Checks the license files below the repository `root`.
///
/// Font files themselves are optional: a missing font only degrades text
/// rendering, a missing license is an issue.
pub fn check_assets(root: &Path) -> AssetReport {
    let mut report = AssetReport::default();

    let license = root.join(PROJECT_LICENSE.path);
    match std::fs::read_to_string(&license) {
        Ok(text) => {
            let text = normalize(&text);
            for marker in MIT_MARKERS {
                if !text.contains(&normalize(marker)) {
                    report.issue(
                        license.clone(),
                        format!("does not match the {} template", PROJECT_LICENSE.kind),
                    );
                    break;
                }
            }
        }
        Err(err) => report.issue(license.clone(), format!("cannot be read: {err}")),
    }
    report.checked.push(license);

    for font in bundled_fonts() {
        let path = root.join(font.license_path);
        if !path.is_file() {
            report.issue(path.clone(), format!("{} license is missing", font.name));
        }
        report.checked.push(path);

        for file in font.font_files {
            if !root.join(file).is_file() {
                tracing::debug!(font = font.name, file = *file, "font file not present");
            }
        }
    }

    tracing::debug!(
        checked = report.checked.len(),
        issues = report.issues.len(),
        "asset check finished"
    );
    report
}

/// Collapses whitespace so re-wrapped license text still matches.
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
