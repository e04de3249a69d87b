use std::path::PathBuf;

use menu_format::{Asset, ParseOptions};

use crate::error::{Error, Result};

pub fn run(path: PathBuf, parse_options: &ParseOptions) -> Result<()> {
    let asset = super::read_asset(&path, parse_options)?;
    let json = serde_json::to_string_pretty(&asset)
        .map_err(|source| Error::Json { path, source })?;
    println!("{}", json);
    Ok(())
}

/// Packs a JSON dump, tagged with `"kind"`, back into its binary container.
pub fn pack(path: PathBuf, output: PathBuf) -> Result<()> {
    let json = super::read_text(&path)?;
    let asset: Asset =
        serde_json::from_str(&json).map_err(|source| Error::Json { path, source })?;

    tracing::debug!(kind = ?asset.kind(), output = %output.display(), "packing");
    super::write_asset(&output, &asset)
}
