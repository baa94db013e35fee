//! Handlers for `render`, `parse` and `assets`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use zpl::{ZplConfig, ZplViewer, check_assets, interpret, parse_labels};

/// Renders the last label, or every label with `all`, and writes PNG files.
pub fn render(config: &ZplConfig, file: &Path, output: Option<&Path>, all: bool) -> Result<()> {
    let input = read_input(file)?;
    let viewer = ZplViewer::new(config);
    if viewer.renderer().fonts().is_empty() {
        tracing::warn!(dir = %config.fonts.dir.display(), "no fonts loaded, text will be skipped");
    }

    let outputs = if all {
        viewer.render_all(&input)?
    } else {
        vec![viewer.parse_and_render(&input)?]
    };

    let base = output.map_or_else(|| file.with_extension("png"), Path::to_path_buf);
    let paths = output_paths(&base, outputs.len());
    for (rendered, path) in outputs.iter().zip(&paths) {
        std::fs::write(path, &rendered.png)
            .with_context(|| format!("writing {}", path.display()))?;
        println!(
            "{} ({}x{})",
            path.display(),
            rendered.width,
            rendered.height
        );
    }
    Ok(())
}

/// Prints parsed commands or interpreted labels.
pub fn parse(file: &Path, json: bool, label: bool) -> Result<()> {
    let input = read_input(file)?;
    let formats = parse_labels(&input)?;

    if label {
        let labels: Vec<_> = formats.iter().map(|commands| interpret(commands)).collect();
        if json {
            println!("{}", serde_json::to_string_pretty(&labels)?);
        } else {
            for (index, label) in labels.iter().enumerate() {
                println!("# label {}", index + 1);
                println!("{label:#?}");
            }
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&formats)?);
    } else {
        for (index, commands) in formats.iter().enumerate() {
            println!("# label {}", index + 1);
            for command in commands {
                println!("{command:?}");
            }
        }
    }
    Ok(())
}

/// Prints the asset report; fails when any license file is missing.
pub fn assets_check(root: &Path) -> Result<()> {
    let report = check_assets(root);
    for path in &report.checked {
        if !report.issues.iter().any(|issue| &issue.path == path) {
            println!("ok      {}", path.display());
        }
    }
    for issue in &report.issues {
        println!("missing {issue}");
    }
    if !report.is_ok() {
        bail!("{} asset issue(s) found", report.issues.len());
    }
    Ok(())
}

fn read_input(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
}

/// `out.png` for one label, `out-1.png`, `out-2.png`, ... for several.
fn output_paths(base: &Path, count: usize) -> Vec<PathBuf> {
    if count <= 1 {
        return vec![base.to_path_buf()];
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "label".to_string());
    let extension = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    (1..=count)
        .map(|n| base.with_file_name(format!("{stem}-{n}.{extension}")))
        .collect()
}
