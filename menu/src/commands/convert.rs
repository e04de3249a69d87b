use std::path::{Path, PathBuf};

use menu_format::{text, Asset, ParseOptions};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    ToText,
    ToMenu,
}

fn direction(path: &Path) -> Result<Direction> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("menu") => Ok(Direction::ToText),
        Some("txt") => Ok(Direction::ToMenu),
        _ => Err(Error::UnknownExtension {
            path: path.to_path_buf(),
        }),
    }
}

/// `.menu` becomes a text document and a `.txt` document becomes a `.menu`.
pub fn run(path: PathBuf, output: Option<PathBuf>, parse_options: &ParseOptions) -> Result<()> {
    match direction(&path)? {
        Direction::ToText => {
            let menu = super::read_menu(&path, parse_options)?;
            let output = output.unwrap_or_else(|| path.with_extension("txt"));
            tracing::debug!(output = %output.display(), "writing text document");
            super::write_bytes(&output, text::to_document(&menu).as_bytes())
        }
        Direction::ToMenu => {
            let source = super::read_text(&path)?;
            let menu = text::from_document(&source).map_err(|source| Error::Decode {
                path: path.clone(),
                source,
            })?;
            let output = output.unwrap_or_else(|| path.with_extension("menu"));
            tracing::debug!(output = %output.display(), "writing menu");
            super::write_asset(&output, &Asset::Menu(menu))
        }
    }
}
